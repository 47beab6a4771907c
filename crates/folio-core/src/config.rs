//! Parse configuration and its validation.
//!
//! `ParseConfig` is the user-facing surface: deserializable, overridable from
//! `FOLIO_*` environment variables, and permissive in its field types so that
//! out-of-range values can be reported instead of silently wrapped.
//! `ParseConfig::validate` turns it into `Thresholds`, the checked form every
//! pipeline stage reads.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use crate::error::{Error, Result};

/// Default merge threshold in words.
pub const DEFAULT_MIN_WORDS_PER_CHAPTER: i64 = 100;
/// Default candidate acceptance threshold.
pub const DEFAULT_HEADING_CONFIDENCE_FLOOR: f64 = 0.3;
/// Default multiplier applied to the font-size standard deviation.
pub const DEFAULT_TYPOGRAPHIC_STD_DEV_MULTIPLIER: f64 = 1.5;
/// Default reading speed used for the reading-time estimate.
pub const DEFAULT_AVERAGE_READING_SPEED_WPM: i64 = 200;

/// Recognized parse options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseConfig {
    /// Chapters with fewer words are merged into a neighbour.
    pub min_words_per_chapter: i64,
    /// Chapters with more words are split at paragraph boundaries. `None` disables splitting.
    pub max_words_per_chunk: Option<i64>,
    /// Candidates scoring below this are dropped.
    pub heading_confidence_floor: f64,
    /// Heading threshold is `mean + multiplier * stddev` of font sizes.
    pub typographic_std_dev_multiplier: f64,
    /// Divisor for `estimated_reading_time`.
    pub average_reading_speed_wpm: i64,
    /// Batch concurrency. `None` uses the number of available cores.
    pub workers: Option<usize>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            min_words_per_chapter: DEFAULT_MIN_WORDS_PER_CHAPTER,
            max_words_per_chunk: None,
            heading_confidence_floor: DEFAULT_HEADING_CONFIDENCE_FLOOR,
            typographic_std_dev_multiplier: DEFAULT_TYPOGRAPHIC_STD_DEV_MULTIPLIER,
            average_reading_speed_wpm: DEFAULT_AVERAGE_READING_SPEED_WPM,
            workers: None,
        }
    }
}

/// Validated thresholds, safe to share read-only across workers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    pub min_words_per_chapter: usize,
    pub max_words_per_chunk: Option<usize>,
    pub heading_confidence_floor: f64,
    pub typographic_std_dev_multiplier: f64,
    pub average_reading_speed_wpm: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        // The defaults always validate.
        Self {
            min_words_per_chapter: DEFAULT_MIN_WORDS_PER_CHAPTER as usize,
            max_words_per_chunk: None,
            heading_confidence_floor: DEFAULT_HEADING_CONFIDENCE_FLOOR,
            typographic_std_dev_multiplier: DEFAULT_TYPOGRAPHIC_STD_DEV_MULTIPLIER,
            average_reading_speed_wpm: DEFAULT_AVERAGE_READING_SPEED_WPM as usize,
        }
    }
}

impl ParseConfig {
    /// Defaults with `FOLIO_*` environment overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides read through `lookup`.
    ///
    /// Unset keys keep their default; set but unparsable keys are a
    /// configuration error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, "FOLIO_MIN_WORDS_PER_CHAPTER")? {
            config.min_words_per_chapter = v;
        }
        if let Some(raw) = lookup("FOLIO_MAX_WORDS_PER_CHUNK") {
            let raw = raw.trim();
            config.max_words_per_chunk = match raw {
                "" | "off" | "none" | "disabled" => None,
                _ => Some(parse_value("FOLIO_MAX_WORDS_PER_CHUNK", raw)?),
            };
        }
        if let Some(v) = parse_var(&lookup, "FOLIO_HEADING_CONFIDENCE_FLOOR")? {
            config.heading_confidence_floor = v;
        }
        if let Some(v) = parse_var(&lookup, "FOLIO_TYPOGRAPHIC_STD_DEV_MULTIPLIER")? {
            config.typographic_std_dev_multiplier = v;
        }
        if let Some(v) = parse_var(&lookup, "FOLIO_AVERAGE_READING_SPEED_WPM")? {
            config.average_reading_speed_wpm = v;
        }
        if let Some(v) = parse_var(&lookup, "FOLIO_WORKERS")? {
            config.workers = Some(v);
        }

        Ok(config)
    }

    /// Check every option and produce the thresholds the pipeline runs on.
    pub fn validate(&self) -> Result<Thresholds> {
        if self.min_words_per_chapter < 0 {
            return Err(Error::Config(format!(
                "minWordsPerChapter must not be negative (got {})",
                self.min_words_per_chapter
            )));
        }
        let min_words = self.min_words_per_chapter as usize;

        let max_words = match self.max_words_per_chunk {
            None => None,
            Some(max) if max <= 0 => {
                return Err(Error::Config(format!(
                    "maxWordsPerChunk must be positive (got {})",
                    max
                )));
            }
            Some(max) if (max as usize) <= min_words => {
                return Err(Error::Config(format!(
                    "maxWordsPerChunk ({}) must exceed minWordsPerChapter ({})",
                    max, min_words
                )));
            }
            Some(max) => Some(max as usize),
        };

        let floor = self.heading_confidence_floor;
        if !floor.is_finite() || !(0.0..=1.0).contains(&floor) {
            return Err(Error::Config(format!(
                "headingConfidenceFloor must lie in [0, 1] (got {})",
                floor
            )));
        }

        let multiplier = self.typographic_std_dev_multiplier;
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(Error::Config(format!(
                "typographicStdDevMultiplier must be a non-negative number (got {})",
                multiplier
            )));
        }

        if self.average_reading_speed_wpm <= 0 {
            return Err(Error::Config(format!(
                "averageReadingSpeedWpm must be positive (got {})",
                self.average_reading_speed_wpm
            )));
        }

        if self.workers == Some(0) {
            return Err(Error::Config("workers must be at least 1".into()));
        }

        Ok(Thresholds {
            min_words_per_chapter: min_words,
            max_words_per_chunk: max_words,
            heading_confidence_floor: floor,
            typographic_std_dev_multiplier: multiplier,
            average_reading_speed_wpm: self.average_reading_speed_wpm as usize,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => {
            debug!("Config override {}={}", key, raw.trim());
            parse_value(key, raw.trim()).map(Some)
        }
        None => Ok(None),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| Error::Config(format!("{} has an invalid value: {:?}", key, raw)))
}
