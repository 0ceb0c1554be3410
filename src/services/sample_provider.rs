//! Built-in example inputs.

use rand::seq::IndexedRandom;

/// Mix of genuine and fabricated headlines.
pub const BUILTIN_SAMPLES: [&str; 10] = [
    "Breaking: Secret alien city discovered under Times Square! Government confirms contact with extraterrestrials in shocking press conference.",
    "The Federal Reserve announced a 0.25% interest rate hike today, aimed at curbing inflation while maintaining economic stability.",
    "Shocking report: Drinking water from a garden hose increases IQ by 50 points! Doctors are baffled.",
    "NASA's James Webb Space Telescope captures stunning new details of the Pillars of Creation, revealing previously unseen stars.",
    "Celebrity admits to being a time traveler from the year 3000, warns of impending robot uprising next Tuesday.",
    "New study published in Nature suggests that global deforestation rates have slowed down by 15% over the last decade.",
    "Government to ban all forms of pizza by 2026 to force citizens to eat more broccoli, says leaked memo.",
    "Local city council approves finalized budget plan for new downtown park and recreation center, set to open in 2025.",
    "You won't believe this one weird trick that makes car insurance companies hate you! Save $1000s instantly.",
    "The World Health Organization declares the recent outbreak effectively contained, thanking international cooperation efforts.",
];

#[derive(Debug, Clone)]
pub struct SampleProvider {
    samples: Vec<String>,
}

impl Default for SampleProvider {
    fn default() -> Self {
        Self::new(BUILTIN_SAMPLES.iter().map(|s| (*s).to_string()).collect())
    }
}

impl SampleProvider {
    pub fn new(samples: Vec<String>) -> Self {
        Self { samples }
    }

    /// Uniformly random sample that differs from `current`.
    ///
    /// Falls back to the only sample there is when `current` is the sole
    /// candidate. Returns `None` only for an empty provider.
    pub fn pick(&self, current: &str) -> Option<&str> {
        let candidates: Vec<&String> = self.samples.iter().filter(|s| s.as_str() != current).collect();
        let mut rng = rand::rng();
        match candidates.choose(&mut rng) {
            Some(&sample) => Some(sample.as_str()),
            None => self.samples.first().map(String::as_str),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_never_returns_current() {
        let provider = SampleProvider::default();
        for current in BUILTIN_SAMPLES {
            for _ in 0..20 {
                let picked = provider.pick(current).unwrap();
                assert_ne!(picked, current);
                assert!(BUILTIN_SAMPLES.contains(&picked));
            }
        }
    }

    #[test]
    fn test_single_sample_is_returned_even_if_current() {
        let provider = SampleProvider::new(vec!["only".to_string()]);
        assert_eq!(provider.pick("only"), Some("only"));
        assert_eq!(provider.pick(""), Some("only"));
    }

    #[test]
    fn test_empty_provider() {
        assert_eq!(SampleProvider::new(Vec::new()).pick(""), None);
    }
}
