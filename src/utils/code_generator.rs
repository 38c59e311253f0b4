//! Short code generation.
//!
//! Two strategies are available:
//!
//! - [`RandomCodeGenerator`] samples codes uniformly from the alphabet. Candidates may
//!   collide, so callers check them against the store before use.
//! - [`SequenceCodeGenerator`] encodes a monotonically increasing counter in base N.
//!   Codes never repeat within one generator.
//!
//! Both draw from an alphabet without visually ambiguous characters (`0/O/o`, `1/l/I`).

use rand::Rng;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default code alphabet.
pub const DEFAULT_ALPHABET: &str = "23456789abcdefghijkmnpqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ";

/// Characters that are easily confused with one another when read or typed.
pub const AMBIGUOUS_CHARS: &[char] = &['0', 'O', 'o', '1', 'l', 'I'];

/// Upper bound for configured code lengths.
pub const MAX_CODE_LENGTH: usize = 32;

/// Codes that are never issued because they clash with service routes.
const RESERVED_CODES: &[&str] = &["api", "health", "admin", "static"];

/// Returns true if `code` is reserved for a service route.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Code generation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeStrategy {
    #[default]
    Random,
    Sequence,
}

impl FromStr for CodeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "sequence" | "seq" => Ok(Self::Sequence),
            other => Err(format!(
                "unknown code strategy '{other}', expected 'random' or 'sequence'"
            )),
        }
    }
}

impl fmt::Display for CodeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => f.write_str("random"),
            Self::Sequence => f.write_str("sequence"),
        }
    }
}

/// Alphabet and length bounds shared by the generators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSettings {
    pub alphabet: String,
    pub min_length: usize,
    pub max_length: usize,
    pub strategy: CodeStrategy,
}

impl Default for CodeSettings {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.to_string(),
            min_length: 6,
            max_length: 10,
            strategy: CodeStrategy::Random,
        }
    }
}

impl CodeSettings {
    /// Checks the alphabet and length bounds.
    ///
    /// # Errors
    ///
    /// Fails if:
    /// - the alphabet has fewer than two symbols, repeats a symbol, or contains
    ///   anything other than ASCII letters and digits
    /// - the alphabet contains one of [`AMBIGUOUS_CHARS`]
    /// - `min_length` is zero, exceeds `max_length`, or `max_length` exceeds
    ///   [`MAX_CODE_LENGTH`]
    pub fn validate(&self) -> anyhow::Result<()> {
        let symbols: Vec<char> = self.alphabet.chars().collect();

        if symbols.len() < 2 {
            anyhow::bail!("CODE_ALPHABET must contain at least 2 symbols");
        }

        if let Some(c) = symbols.iter().find(|c| !c.is_ascii_alphanumeric()) {
            anyhow::bail!("CODE_ALPHABET may only contain ASCII letters and digits, got '{c}'");
        }

        if let Some(c) = symbols.iter().find(|c| AMBIGUOUS_CHARS.contains(c)) {
            anyhow::bail!("CODE_ALPHABET must not contain the ambiguous character '{c}'");
        }

        let mut sorted = symbols.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != symbols.len() {
            anyhow::bail!("CODE_ALPHABET must not repeat symbols");
        }

        if self.min_length == 0 {
            anyhow::bail!("CODE_MIN_LENGTH must be at least 1");
        }

        if self.min_length > self.max_length {
            anyhow::bail!(
                "CODE_MIN_LENGTH ({}) must not exceed CODE_MAX_LENGTH ({})",
                self.min_length,
                self.max_length
            );
        }

        if self.max_length > MAX_CODE_LENGTH {
            anyhow::bail!(
                "CODE_MAX_LENGTH must be at most {MAX_CODE_LENGTH}, got {}",
                self.max_length
            );
        }

        Ok(())
    }

    /// Builds the generator selected by [`CodeSettings::strategy`].
    ///
    /// `sequence_start` seeds the counter of the sequence strategy, typically with the
    /// number of links already stored so a restarted service does not replay codes.
    pub fn build_generator(&self, sequence_start: u64) -> Box<dyn CodeGenerator> {
        match self.strategy {
            CodeStrategy::Random => Box::new(RandomCodeGenerator::new(self)),
            CodeStrategy::Sequence => {
                Box::new(SequenceCodeGenerator::starting_at(self, sequence_start))
            }
        }
    }
}

/// Source of candidate short codes.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Produces the next candidate code, or `None` when the code space is used up.
    fn next_code(&self) -> Option<String>;

    /// Whether candidates may repeat and must be checked against the store.
    fn needs_collision_check(&self) -> bool {
        true
    }
}

/// Uniform random codes with a length in `[min_length, max_length]`.
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    alphabet: Vec<u8>,
    min_length: usize,
    max_length: usize,
}

impl RandomCodeGenerator {
    pub fn new(settings: &CodeSettings) -> Self {
        Self {
            alphabet: settings.alphabet.as_bytes().to_vec(),
            min_length: settings.min_length,
            max_length: settings.max_length,
        }
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn next_code(&self) -> Option<String> {
        let mut rng = rand::rng();
        let length = rng.random_range(self.min_length..=self.max_length);

        Some(
            (0..length)
                .map(|_| char::from(self.alphabet[rng.random_range(0..self.alphabet.len())]))
                .collect(),
        )
    }
}

/// Base-N encoding of an atomic counter, left-padded to `min_length`.
///
/// Natural encodings never start with the zero symbol, so padding with it keeps
/// codes distinct.
#[derive(Debug)]
pub struct SequenceCodeGenerator {
    alphabet: Vec<u8>,
    min_length: usize,
    max_length: usize,
    next: AtomicU64,
}

impl SequenceCodeGenerator {
    pub fn new(settings: &CodeSettings) -> Self {
        Self::starting_at(settings, 0)
    }

    pub fn starting_at(settings: &CodeSettings, start: u64) -> Self {
        Self {
            alphabet: settings.alphabet.as_bytes().to_vec(),
            min_length: settings.min_length,
            max_length: settings.max_length,
            next: AtomicU64::new(start),
        }
    }

    fn encode(&self, mut n: u64) -> String {
        let base = self.alphabet.len() as u64;
        let mut digits = Vec::with_capacity(self.min_length);

        loop {
            digits.push(self.alphabet[(n % base) as usize]);
            n /= base;
            if n == 0 {
                break;
            }
        }

        while digits.len() < self.min_length {
            digits.push(self.alphabet[0]);
        }

        digits.into_iter().rev().map(char::from).collect()
    }
}

impl CodeGenerator for SequenceCodeGenerator {
    fn next_code(&self) -> Option<String> {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        let code = self.encode(n);

        (code.len() <= self.max_length).then_some(code)
    }

    fn needs_collision_check(&self) -> bool {
        false
    }
}
