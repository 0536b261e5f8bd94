//! Statistical language identification behind a trait seam. The
//! pipeline only ever asks two questions: "is this confidently English?"
//! and "is this confidently some one other language?", both answered by
//! repeated sampling with a unanimity rule.

use oaicorpus_core::DetectorConfig;

/// One detection pass. `None` means the detector could not classify the
/// text at all (too short, mixed script); that is never an error, just
/// "not confident".
pub trait LanguageDetector {
    fn detect(&self, text: &str) -> Option<Detection>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// ISO 639 code as reported by the detector (`en`, `eng`, `de`, ...).
    pub language: String,
    pub confidence: f64,
}

// ─── Whatlang backend ───────────────────────────────────────

#[derive(Debug, Default)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<Detection> {
        let info = whatlang::detect(text)?;
        Some(Detection {
            language: info.lang().code().to_string(),
            confidence: info.confidence(),
        })
    }
}

// ─── Repeat-sampling vote ───────────────────────────────────

/// Runs `repetitions` independent passes and only trusts a unanimous
/// outcome: every pass must report the same top language with a
/// probability above `threshold`. Any disagreement, low-confidence pass,
/// or detector failure makes the whole vote fail. The averaged
/// probability is diagnostic only and never part of the decision.
#[derive(Debug, Clone, Copy)]
pub struct EnglishCheck {
    repetitions: usize,
    threshold: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vote {
    pub language: String,
    /// Mean of the per-pass probabilities, for logging.
    pub mean_confidence: f64,
}

fn is_english_code(code: &str) -> bool {
    code == "en" || code == "eng"
}

impl EnglishCheck {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            repetitions: config.repetitions.max(1),
            threshold: config.threshold,
        }
    }

    fn unanimous(&self, detector: &dyn LanguageDetector, text: &str) -> Option<Vote> {
        let mut language: Option<String> = None;
        let mut total = 0.0;
        for _ in 0..self.repetitions {
            let pass = detector.detect(text)?;
            if pass.confidence <= self.threshold {
                return None;
            }
            match &language {
                None => language = Some(pass.language),
                Some(first) if *first != pass.language => return None,
                Some(_) => {}
            }
            total += pass.confidence;
        }
        language.map(|language| Vote {
            language,
            mean_confidence: total / self.repetitions as f64,
        })
    }

    /// True when every pass agrees the text is English above threshold.
    pub fn is_english(&self, detector: &dyn LanguageDetector, text: &str) -> bool {
        match self.unanimous(detector, text) {
            Some(vote) if is_english_code(&vote.language) => {
                tracing::debug!(
                    mean_confidence = vote.mean_confidence,
                    "text confirmed English"
                );
                true
            }
            _ => false,
        }
    }

    /// The one non-English language every pass agrees on, if any. Used
    /// to flag records whose chosen title or abstract slipped through
    /// with a wrong or swapped language tag.
    pub fn confident_foreign(&self, detector: &dyn LanguageDetector, text: &str) -> Option<Vote> {
        self.unanimous(detector, text)
            .filter(|vote| !is_english_code(&vote.language))
    }
}
