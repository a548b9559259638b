//! Intent classifier port.

use async_trait::async_trait;

use super::ai_provider::AIError;
use crate::domain::exploration::{ClassificationInput, ClassificationResult};
use crate::domain::foundation::SessionId;

/// Turns a free-form reply into a [`ClassificationResult`].
///
/// Unparsable collaborator output yields `ClassificationResult::default()`.
/// `AIError` means the collaborator could not be reached.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(
        &self,
        session_id: &SessionId,
        input: &ClassificationInput,
    ) -> Result<ClassificationResult, AIError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_classifier_is_object_safe() {
        fn _accepts_dyn(_c: &dyn IntentClassifier) {}
    }
}
