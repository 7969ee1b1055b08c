use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::from_str;
use thiserror::Error;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// Difficulty tier selecting which word pool prompts are drawn from
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    /// Parse a tier name case-insensitively, falling back to `Normal` for
    /// anything unrecognized.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Normal,
        }
    }

    fn pool_file(&self) -> String {
        format!("{self}.json")
    }
}

impl From<String> for Difficulty {
    fn from(raw: String) -> Self {
        Difficulty::parse_or_default(&raw)
    }
}

impl From<Difficulty> for String {
    fn from(d: Difficulty) -> Self {
        d.to_string()
    }
}

#[derive(Debug, Error)]
pub enum WordPoolError {
    #[error("word pool file not found: {0}")]
    NotFound(String),
    #[error("word pool file {0} is not valid utf-8")]
    Encoding(String),
    #[error("word pool file {file} could not be parsed: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("word pool {0} is empty")]
    Empty(String),
    #[error("word pool {file} declares {declared} words but holds {actual}")]
    SizeMismatch {
        file: String,
        declared: usize,
        actual: usize,
    },
}

/// A fixed list of prompts for one difficulty tier
#[derive(Deserialize, Clone, Debug)]
pub struct WordPool {
    pub name: String,
    pub size: usize,
    pub words: Vec<String>,
}

impl WordPool {
    pub fn load(difficulty: Difficulty) -> Result<Self, WordPoolError> {
        read_pool_from_file(difficulty.pool_file())
    }
}

fn read_pool_from_file(file_name: String) -> Result<WordPool, WordPoolError> {
    let file = LANG_DIR
        .get_file(&file_name)
        .ok_or_else(|| WordPoolError::NotFound(file_name.clone()))?;

    let contents = file
        .contents_utf8()
        .ok_or_else(|| WordPoolError::Encoding(file_name.clone()))?;

    parse_pool(&file_name, contents)
}

fn parse_pool(file_name: &str, contents: &str) -> Result<WordPool, WordPoolError> {
    let mut pool: WordPool = from_str(contents).map_err(|source| WordPoolError::Parse {
        file: file_name.to_string(),
        source,
    })?;

    if pool.size != pool.words.len() {
        return Err(WordPoolError::SizeMismatch {
            file: file_name.to_string(),
            declared: pool.size,
            actual: pool.words.len(),
        });
    }

    pool.words.retain(|w| !w.is_empty());
    if pool.words.is_empty() {
        return Err(WordPoolError::Empty(file_name.to_string()));
    }

    Ok(pool)
}

/// Supplies the next prompt for a difficulty tier
pub trait WordSource {
    fn next(&mut self, difficulty: Difficulty) -> String;
}

/// Uniform random draw from the built-in pools
#[derive(Debug)]
pub struct RandomWordSource<R: Rng = rand::rngs::ThreadRng> {
    easy: WordPool,
    normal: WordPool,
    hard: WordPool,
    rng: R,
}

impl RandomWordSource {
    pub fn new() -> Result<Self, WordPoolError> {
        Self::with_rng(rand::thread_rng())
    }
}

impl<R: Rng> RandomWordSource<R> {
    pub fn with_rng(rng: R) -> Result<Self, WordPoolError> {
        Ok(Self {
            easy: WordPool::load(Difficulty::Easy)?,
            normal: WordPool::load(Difficulty::Normal)?,
            hard: WordPool::load(Difficulty::Hard)?,
            rng,
        })
    }

    pub fn pool(&self, difficulty: Difficulty) -> &WordPool {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Normal => &self.normal,
            Difficulty::Hard => &self.hard,
        }
    }
}

impl<R: Rng> WordSource for RandomWordSource<R> {
    fn next(&mut self, difficulty: Difficulty) -> String {
        let pool = match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Normal => &self.normal,
            Difficulty::Hard => &self.hard,
        };
        // pools are validated non-empty at load time
        pool.words.choose(&mut self.rng).cloned().unwrap_or_default()
    }
}

/// Replays a fixed list of words in order, cycling when exhausted.
/// Handy for headless sessions where prompts must be predictable.
#[derive(Debug, Clone)]
pub struct ScriptedWordSource {
    words: Vec<String>,
    next_idx: usize,
}

impl ScriptedWordSource {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
            next_idx: 0,
        }
    }
}

impl WordSource for ScriptedWordSource {
    fn next(&mut self, _difficulty: Difficulty) -> String {
        if self.words.is_empty() {
            return String::new();
        }
        let word = self.words[self.next_idx % self.words.len()].clone();
        self.next_idx += 1;
        word
    }
}
