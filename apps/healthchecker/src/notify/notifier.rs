use std::sync::Arc;

use tracing::error;

use super::template::{ErrorReport, replace_variables};
use crate::error::{NotifyError, describe_chain};
use crate::monitoring::checker::Checker;
use crate::monitoring::types::{Check, ObservedResponse, RequestTemplate};

/// Status the notification endpoint must answer with
const NOTIFY_SUCCESS_CODE: u16 = 200;

/// Sends failure alerts built from a shared request template
pub struct Notifier {
    template: Arc<RequestTemplate>,
    checker: Arc<dyn Checker>,
}

impl Notifier {
    pub fn new(template: RequestTemplate, checker: Arc<dyn Checker>) -> Self {
        Self { template: Arc::new(template), checker }
    }

    /// The template every notification is built from
    pub fn template(&self) -> &RequestTemplate {
        &self.template
    }

    /// Build the notification request for one failure.
    ///
    /// The shared template is cloned, only the copy gets its body rewritten.
    pub fn compose(&self, report: &ErrorReport) -> RequestTemplate {
        let mut request = RequestTemplate::clone(&self.template);
        request.body = replace_variables(&self.template.body, report);
        request
    }

    /// Report a failing check.
    ///
    /// Failures of the notification channel are logged here and returned
    /// for bookkeeping; callers must not treat them as fatal.
    pub async fn notify(
        &self,
        check: &Check,
        observed: Option<&ObservedResponse>,
        cause: &(dyn std::error::Error + Send + Sync),
    ) -> Result<(), NotifyError> {
        let observed_text = observed.map_or_else(|| "none".to_string(), ToString::to_string);
        error!(
            service = %check.service,
            expected = %check.expected,
            observed = %observed_text,
            "ERROR: {}: {}",
            check.service,
            describe_chain(cause)
        );

        let report = ErrorReport::new(check.service.clone(), cause);
        let request = self.compose(&report);

        let result = match self.checker.call(&request, "").await {
            Ok(response) if response.code == NOTIFY_SUCCESS_CODE => Ok(()),
            Ok(response) => Err(NotifyError::UnexpectedStatus(response.code)),
            Err(e) => Err(NotifyError::Dispatch(e)),
        };

        if let Err(e) = &result {
            error!(service = %check.service, endpoint = %request.endpoint, "ERROR: notification error: {}", describe_chain(e));
        }

        result
    }
}
