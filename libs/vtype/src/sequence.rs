use serde::Deserialize;

use crate::capability::{self, Capability, Source, Target, Value, short_type_name};
use crate::convert;
use crate::error::{ConfigError, ConvertError};
use crate::render as rendering;
use crate::resolve::{Chain, Handle, Slot};

// ═══════════════════════════════════════════════════════════════
//  Configuration
// ═══════════════════════════════════════════════════════════════

/// How one raw token maps to elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitMode {
    /// The whole token is one element.
    #[default]
    WholeToken,
    /// The token is split on the separator; each non-empty chunk is an element.
    PerSeparator,
}

/// What a second conversion call does with elements from earlier calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccumulateMode {
    /// Every non-empty call starts from an empty sequence.
    ReplaceEachCall,
    /// Only the first non-empty call clears; later calls append.
    #[default]
    AppendAcrossCalls,
}

/// Sequence binding configuration. Only read at accumulation and render time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SequenceConfig {
    /// Split delimiter and render joiner.
    #[serde(default = "default_separator")]
    pub separator: String,

    #[serde(default)]
    pub split: SplitMode,

    #[serde(default)]
    pub accumulate: AccumulateMode,
}

fn default_separator() -> String {
    ",".into()
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            split: SplitMode::default(),
            accumulate: AccumulateMode::default(),
        }
    }
}

impl SequenceConfig {
    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Split every token on the separator.
    pub fn split_each(mut self) -> Self {
        self.split = SplitMode::PerSeparator;
        self
    }

    pub fn replace_each_call(mut self) -> Self {
        self.accumulate = AccumulateMode::ReplaceEachCall;
        self
    }

    /// Element name, annotated with the separator when tokens are split.
    pub fn annotate(&self, element_name: &str) -> String {
        match self.split {
            SplitMode::PerSeparator => format!("{element_name}(multisep:{})", self.separator),
            SplitMode::WholeToken => element_name.to_owned(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Accumulator
// ═══════════════════════════════════════════════════════════════

/// Per-binding accumulation state.
///
/// `started` flips on the first non-empty call and is never reset; until then
/// a call clears whatever the destination held before.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    config: SequenceConfig,
    started: bool,
}

impl Accumulator {
    pub fn new(config: SequenceConfig) -> Self {
        Self {
            config,
            started: false,
        }
    }

    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}

/// Mutable side of a sequence destination.
pub trait SequenceTarget: Value {
    /// Replace the contents with an empty sequence.
    fn reset(&mut self);

    /// Convert `raw` into a freshly allocated element and append it.
    /// Nothing is appended on failure.
    fn push_parsed(&mut self, raw: &str) -> Result<(), ConvertError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared side of a sequence destination.
pub trait SequenceSource {
    fn element_capability(&self) -> Capability;

    fn element_type_name(&self) -> String;

    /// Best-effort text of every element.
    fn element_texts(&self) -> Vec<String>;
}

/// Feed one raw token into a sequence destination.
///
/// Empty input is a no-op. Otherwise the destination is cleared first unless
/// an earlier call already started appending, and every non-empty chunk is
/// converted and appended in order. The first failing chunk stops the call;
/// chunks appended before it stay.
pub fn accumulate(
    accumulator: &mut Accumulator,
    sequence: &mut dyn SequenceTarget,
    raw: &str,
) -> Result<(), ConvertError> {
    if raw.is_empty() {
        return Ok(());
    }

    if !accumulator.started || accumulator.config.accumulate == AccumulateMode::ReplaceEachCall {
        tracing::debug!(started = accumulator.started, "clearing sequence");
        sequence.reset();
    }
    accumulator.started = true;

    let chunks: Vec<&str> = match accumulator.config.split {
        SplitMode::PerSeparator => raw.split(accumulator.config.separator.as_str()).collect(),
        SplitMode::WholeToken => vec![raw],
    };

    let identity = sequence.type_identity();
    for (index, chunk) in chunks.into_iter().enumerate() {
        if chunk.is_empty() {
            continue;
        }
        sequence
            .push_parsed(chunk)
            .map_err(|e| e.in_sequence(short_type_name(identity), index))?;
    }
    Ok(())
}

/// Join the elements with the configured separator.
pub fn render(config: &SequenceConfig, sequence: &dyn SequenceSource) -> String {
    sequence.element_texts().join(&config.separator)
}

pub fn type_name(config: &SequenceConfig, sequence: &dyn SequenceSource) -> String {
    config.annotate(&sequence.element_type_name())
}

pub fn is_bool_element(sequence: &dyn SequenceSource) -> bool {
    sequence.element_capability().is_bool_like()
}

// ═══════════════════════════════════════════════════════════════
//  Vec<E>
// ═══════════════════════════════════════════════════════════════

impl<E: Handle + Default> Value for Vec<E> {
    fn target(&mut self) -> Target<'_> {
        Target::Sequence(self)
    }

    fn source(&self) -> Source<'_> {
        Source::Sequence(self)
    }

    fn materialize() -> Option<Self> {
        Some(Vec::new())
    }
}

impl<E: Handle + Default> SequenceTarget for Vec<E> {
    fn reset(&mut self) {
        *self = Vec::new();
    }

    fn push_parsed(&mut self, raw: &str) -> Result<(), ConvertError> {
        let mut element = E::default();
        convert::convert(&mut element, raw)?;
        self.push(element);
        Ok(())
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl<E: Handle + Default> SequenceSource for Vec<E> {
    fn element_capability(&self) -> Capability {
        match <E::Terminal as Value>::materialize() {
            Some(probe) => capability::classify(&probe),
            None => Capability::Unsupported,
        }
    }

    fn element_type_name(&self) -> String {
        rendering::type_name(&E::default())
    }

    fn element_texts(&self) -> Vec<String> {
        self.iter().map(rendering::default_text).collect()
    }
}

impl<E: Handle + Default> Handle for Vec<E> {
    type Terminal = Self;

    const DEPTH: usize = 0;

    fn resolve_into<'a>(&'a mut self, _chain: &mut Chain) -> Slot<'a, Self> {
        Slot::Occupied(self)
    }

    fn resolve_ref(&self) -> Option<&Self> {
        Some(self)
    }

    fn wrap(terminal: Self) -> Self {
        terminal
    }
}
