use fantoccini::elements::Element;
use rand::rngs::OsRng;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, Default)]
/// Deliberate pacing between browser actions: fixed pauses between workflow
/// steps, jittered gaps between keystrokes.
pub struct Pacer {}

impl Pacer {
    pub fn new() -> Self {
        Self {}
    }

    /// Sleep for a fixed duration.
    pub async fn pause(&self, duration: Duration) {
        sleep(duration).await;
    }

    /// Sleep for a random duration between `min` and `max` milliseconds.
    pub async fn jitter(&self, min: u64, max: u64) {
        let mut rng = OsRng;
        let ms = rng.gen_range(min..=max);
        sleep(Duration::from_millis(ms)).await;
    }

    /// Type the provided text with small random delays between characters.
    pub async fn type_text(
        &self,
        element: &Element,
        text: &str,
    ) -> Result<(), fantoccini::error::CmdError> {
        for ch in text.chars() {
            element.send_keys(&ch.to_string()).await?;
            self.jitter(30, 150).await;
        }
        Ok(())
    }
}
