//! Chain descriptions and their execution order.
//!
//! # Design Decisions
//! - A chain is written outermost first: `A|B|C` means A wraps B wraps C
//! - Links are stored innermost first so iteration yields execution order
//! - Names are trimmed and lowercased at parse time
//! - The not-found error factory is bound here but only invoked by whoever
//!   resolves links against installed components

use std::fmt;

use thiserror::Error;

/// Raised when a chain link names a component that is not installed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("processor [{0}] not found")]
    ProcessorNotFound(String),

    #[error("stream processor [{0}] not found")]
    StreamProcessorNotFound(String),

    #[error("component [{0}] not found")]
    ComponentNotFound(String),
}

/// Builds the not-found error for a link name.
pub type NotFoundFactory = fn(&str) -> ResolutionError;

fn processor_not_found(name: &str) -> ResolutionError {
    ResolutionError::ProcessorNotFound(name.to_string())
}

fn stream_processor_not_found(name: &str) -> ResolutionError {
    ResolutionError::StreamProcessorNotFound(name.to_string())
}

fn component_not_found(name: &str) -> ResolutionError {
    ResolutionError::ComponentNotFound(name.to_string())
}

/// One link in a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackConfigExpression {
    /// Reserved; always empty for now.
    pub alias: String,
    pub name: String,
}

/// A parsed chain in execution order.
#[derive(Debug, Clone)]
pub struct StackConfig {
    links: Vec<StackConfigExpression>,
    not_found: NotFoundFactory,
}

impl StackConfig {
    /// Parse a pipe-delimited chain.
    ///
    /// `"HeadersParser|Header|Debugger"` yields links
    /// `debugger, header, headersparser`. Blank input yields no links.
    pub fn parse(chain: &str) -> Self {
        Self::with_factory(chain, component_not_found)
    }

    /// Parse a processor chain.
    pub fn processors(chain: &str) -> Self {
        Self::with_factory(chain, processor_not_found)
    }

    /// Parse a stream processor chain.
    pub fn stream_processors(chain: &str) -> Self {
        Self::with_factory(chain, stream_processor_not_found)
    }

    fn with_factory(chain: &str, not_found: NotFoundFactory) -> Self {
        let normalized = chain.trim().to_lowercase();
        let links = if normalized.is_empty() {
            Vec::new()
        } else {
            normalized
                .split('|')
                .rev()
                .map(|name| StackConfigExpression {
                    alias: String::new(),
                    name: name.to_string(),
                })
                .collect()
        };
        Self { links, not_found }
    }

    /// Links in execution order.
    pub fn links(&self) -> &[StackConfigExpression] {
        &self.links
    }

    /// Link names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(|l| l.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Build the not-found error for `name` using the bound factory.
    pub fn not_found(&self, name: &str) -> ResolutionError {
        (self.not_found)(name)
    }

    /// Resolve every link through `lookup`, in execution order.
    ///
    /// Fails on the first link `lookup` does not know.
    pub fn resolve<T, F>(&self, mut lookup: F) -> Result<Vec<T>, ResolutionError>
    where
        F: FnMut(&str) -> Option<T>,
    {
        self.names()
            .map(|name| lookup(name).ok_or_else(|| self.not_found(name)))
            .collect()
    }
}

impl fmt::Display for StackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.names().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", name)?;
        }
        Ok(())
    }
}
