use async_trait::async_trait;

use stocksnap_inventory::{InventoryItem, ScanGuess};

use crate::error::ExtractionError;
use crate::prompt::build_prompt;
use crate::response::parse_guesses;

/// Photographed list, base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub data_base64: String,
    pub mime_type: String,
}

impl ImagePayload {
    pub fn new(data_base64: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data_base64: data_base64.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Turns an image into scan guesses.
///
/// Implementations may be slow and unreliable; callers treat any error as
/// fatal for the current scan.
#[async_trait]
pub trait VisionExtractor: Send + Sync {
    async fn extract(
        &self,
        image: &ImagePayload,
        known_names: &[String],
    ) -> Result<Vec<ScanGuess>, ExtractionError>;
}

/// A multimodal model that answers a text prompt about an image.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, prompt: &str, image: &ImagePayload) -> Result<String, ExtractionError>;
}

/// [`VisionExtractor`] that prompts a [`ModelClient`] and parses its JSON answer.
#[derive(Debug, Clone)]
pub struct PromptedExtractor<M> {
    model: M,
}

impl<M: ModelClient> PromptedExtractor<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }
}

#[async_trait]
impl<M: ModelClient> VisionExtractor for PromptedExtractor<M> {
    async fn extract(
        &self,
        image: &ImagePayload,
        known_names: &[String],
    ) -> Result<Vec<ScanGuess>, ExtractionError> {
        if image.data_base64.is_empty() {
            return Err(ExtractionError::InvalidInput("image payload is empty".to_string()));
        }
        let prompt = build_prompt(known_names);
        let text = self.model.generate(&prompt, image).await?;
        parse_guesses(&text)
    }
}

/// Read a photographed list using the current inventory names as hints.
pub async fn scan_image(
    extractor: &dyn VisionExtractor,
    image: &ImagePayload,
    inventory: &[InventoryItem],
) -> Result<Vec<ScanGuess>, ExtractionError> {
    let known_names: Vec<String> = inventory.iter().map(|i| i.name().to_string()).collect();

    match extractor.extract(image, &known_names).await {
        Ok(guesses) => {
            let needs_review = guesses.iter().filter(|g| g.needs_review()).count();
            tracing::info!(guesses = guesses.len(), needs_review, "extracted scan guesses");
            Ok(guesses)
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to analyze list image");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use stocksnap_core::ItemId;
    use stocksnap_inventory::Category;

    struct CannedModel {
        answer: Result<String, String>,
        seen_prompt: Mutex<Option<String>>,
    }

    impl CannedModel {
        fn ok(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_string()),
                seen_prompt: Mutex::new(None),
            }
        }

        fn failing(msg: &str) -> Self {
            Self {
                answer: Err(msg.to_string()),
                seen_prompt: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ModelClient for CannedModel {
        async fn generate(&self, prompt: &str, _image: &ImagePayload) -> Result<String, ExtractionError> {
            *self.seen_prompt.lock().unwrap() = Some(prompt.to_string());
            self.answer.clone().map_err(ExtractionError::ExtractorFailed)
        }
    }

    fn image() -> ImagePayload {
        ImagePayload::new("aGVsbG8=", "image/jpeg")
    }

    #[tokio::test]
    async fn scan_image_passes_inventory_names_as_hints() {
        let extractor = PromptedExtractor::new(CannedModel::ok(
            r#"[{"name": "Chicken Breast", "quantity": 2, "originalText": "chx"}]"#,
        ));
        let inventory = vec![InventoryItem::new(
            ItemId::parse("1").unwrap(),
            "Chicken Breast",
            Category::Other,
            0,
        )];

        let guesses = scan_image(&extractor, &image(), &inventory).await.unwrap();
        assert_eq!(guesses, vec![ScanGuess {
            name: "Chicken Breast".to_string(),
            quantity: 2,
            original_text: "chx".to_string(),
            confidence: Default::default(),
            alternatives: Vec::new(),
        }]);

        let prompt = extractor.model.seen_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Chicken Breast"));
    }

    #[tokio::test]
    async fn model_failure_is_propagated() {
        let extractor = PromptedExtractor::new(CannedModel::failing("quota exceeded"));
        match scan_image(&extractor, &image(), &[]).await {
            Err(ExtractionError::ExtractorFailed(msg)) => assert_eq!(msg, "quota exceeded"),
            other => panic!("Expected ExtractorFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_image_is_rejected_before_calling_the_model() {
        let extractor = PromptedExtractor::new(CannedModel::ok("[]"));
        let err = extractor
            .extract(&ImagePayload::new("", "image/png"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidInput(_)));
        assert!(extractor.model.seen_prompt.lock().unwrap().is_none());
    }
}
