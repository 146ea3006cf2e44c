use thiserror::Error;

/// Reasons a navigator cannot be mounted. No instance exists when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("The list of block codes is empty.")]
    EmptyBlockList,
    #[error(
        "The initial block code ({0}) is not in the list of block codes passed to the viewer."
    )]
    InvalidInitialSelection(String),
}

/// Everything needed to mount a navigator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountConfig {
    pub proposal_code: String,
    pub block_codes: Vec<String>,
    pub initial_block: Option<String>,
}

impl MountConfig {
    pub fn new(proposal_code: impl Into<String>, block_codes: Vec<String>) -> Self {
        Self {
            proposal_code: proposal_code.into(),
            block_codes,
            initial_block: None,
        }
    }

    pub fn with_initial_block(mut self, block_code: impl Into<String>) -> Self {
        self.initial_block = Some(block_code.into());
        self
    }
}

/// Ordered, non-empty list of block codes. The order is the navigation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockList {
    codes: Vec<String>,
}

impl BlockList {
    pub fn new(codes: Vec<String>) -> Result<Self, ConfigurationError> {
        if codes.is_empty() {
            return Err(ConfigurationError::EmptyBlockList);
        }
        Ok(Self { codes })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Index of the last block. Never underflows since the list is non-empty.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.codes.len().saturating_sub(1)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.codes.get(index).map(String::as_str)
    }

    /// First position of `code`, if present.
    #[must_use]
    pub fn position(&self, code: &str) -> Option<usize> {
        self.codes.iter().position(|candidate| candidate == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    /// Resolves the starting index for an optional initial selection.
    pub fn initial_index(&self, initial: Option<&str>) -> Result<usize, ConfigurationError> {
        match initial {
            None => Ok(0),
            Some(code) => self
                .position(code)
                .ok_or_else(|| ConfigurationError::InvalidInitialSelection(code.to_string())),
        }
    }
}

/// Splits the comma separated form (`"b1, b2 ,b3"`) into block codes.
/// Whitespace around each code is ignored and empty entries are dropped.
pub fn parse_block_codes(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(String::from)
        .collect()
}
