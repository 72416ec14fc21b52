use report_compare::{CompareError, FetchedReport, ReportFetcher, ReportId, RequestParams, Result};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
struct MockResponse {
    report: ReportId,
    params: BTreeMap<String, String>,
    result: FetchedReport,
}

/// Fake report engine answering from registered responses.
///
/// A fetch gets the response for the same report whose parameters are all
/// present in the request; the one with the most parameters wins, then the
/// earliest registered. Every fetch is recorded.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: Vec<MockResponse>,
    calls: Mutex<Vec<(ReportId, RequestParams)>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        report: ReportId,
        params: &[(&str, &str)],
        result: impl Into<FetchedReport>,
    ) {
        self.responses.push(MockResponse {
            report,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            result: result.into(),
        });
    }

    /// Requests seen so far, in arrival order.
    pub fn calls(&self) -> Vec<(ReportId, RequestParams)> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

impl ReportFetcher for MockFetcher {
    fn fetch(&self, report: &ReportId, params: &RequestParams) -> Result<FetchedReport> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((report.clone(), params.clone()));
        }

        self.responses
            .iter()
            .filter(|response| &response.report == report && params.matches(&response.params))
            .min_by_key(|response| Reverse(response.params.len()))
            .map(|response| response.result.clone())
            .ok_or_else(|| {
                CompareError::Fetch {
                    report: report.to_string(),
                    message: format!("no mock response for {}", params),
                }
                .into()
            })
    }
}

/// Report engine that rejects every request, like a stale `idSubtable`.
#[derive(Debug, Clone)]
pub struct FailingFetcher {
    message: String,
}

impl FailingFetcher {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FailingFetcher {
    fn default() -> Self {
        Self::new("requested subtable does not exist")
    }
}

impl ReportFetcher for FailingFetcher {
    fn fetch(&self, report: &ReportId, _params: &RequestParams) -> Result<FetchedReport> {
        Err(CompareError::Fetch {
            report: report.to_string(),
            message: self.message.clone(),
        }
        .into())
    }
}
