//! Default population for a freshly loaded configuration.
//!
//! # Rules
//! Each rule probes a key under one component and, when the key is missing,
//! writes a default under a (possibly different) component:
//!
//! | probe                                   | write                                   |
//! |-----------------------------------------|-----------------------------------------|
//! | `gateways.default.save_workers_size`    | `gateways.default.save_workers_size`    |
//! | `gateways.default.save_process`         | `gateways.default.save_process`         |
//! | `processors.default.primary_mail_host`  | `processors.Header.primary_mail_host`   |
//! | `processors.default.log_received_mails` | `processors.Debugger.log_received_mails`|
//!
//! The processor rules probe `default` but write to `Header` and `Debugger`.
//! That mismatch is long-standing behavior and is kept as is; see DESIGN.md.

use std::io;

use thiserror::Error;

use crate::config::namespace::Namespace;
use crate::config::schema::BackendConfig;
use crate::config::value::ConfigValue;

/// Chain installed on the default gateway when none is configured.
pub const DEFAULT_SAVE_PROCESS: &str = "HeadersParser|Header|Debugger";

/// Errors raised while applying defaults.
#[derive(Debug, Error)]
pub enum DefaultsError {
    /// The local host name could not be determined.
    #[error("hostname lookup failed: {0}")]
    HostnameLookup(#[source] io::Error),
}

/// The value a rule writes when its probe is missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Integer(i64),
    Str(&'static str),
    Bool(bool),
    /// Resolved at application time from the local host name.
    Hostname,
}

/// A single check-here/write-there default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultRule {
    pub namespace: Namespace,
    pub probe_component: &'static str,
    pub probe_key: &'static str,
    pub target_component: &'static str,
    pub target_key: &'static str,
    pub value: DefaultValue,
}

/// Rules applied by [`BackendConfig::configure_defaults`], in order.
pub const DEFAULT_RULES: &[DefaultRule] = &[
    DefaultRule {
        namespace: Namespace::Gateways,
        probe_component: "default",
        probe_key: "save_workers_size",
        target_component: "default",
        target_key: "save_workers_size",
        value: DefaultValue::Integer(1),
    },
    DefaultRule {
        namespace: Namespace::Gateways,
        probe_component: "default",
        probe_key: "save_process",
        target_component: "default",
        target_key: "save_process",
        value: DefaultValue::Str(DEFAULT_SAVE_PROCESS),
    },
    DefaultRule {
        namespace: Namespace::Processors,
        probe_component: "default",
        probe_key: "primary_mail_host",
        target_component: "Header",
        target_key: "primary_mail_host",
        value: DefaultValue::Hostname,
    },
    DefaultRule {
        namespace: Namespace::Processors,
        probe_component: "default",
        probe_key: "log_received_mails",
        target_component: "Debugger",
        target_key: "log_received_mails",
        value: DefaultValue::Bool(true),
    },
];

/// Source of the local host name.
pub trait HostnameResolver {
    fn hostname(&self) -> io::Result<String>;
}

/// Resolves the host name from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHostname;

impl HostnameResolver for SystemHostname {
    fn hostname(&self) -> io::Result<String> {
        hostname::get()?
            .into_string()
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "hostname is not valid UTF-8"))
    }
}

impl DefaultValue {
    fn resolve<R: HostnameResolver + ?Sized>(&self, resolver: &R) -> Result<ConfigValue, DefaultsError> {
        Ok(match self {
            DefaultValue::Integer(i) => ConfigValue::Integer(*i),
            DefaultValue::Str(s) => ConfigValue::from(*s),
            DefaultValue::Bool(b) => ConfigValue::Bool(*b),
            DefaultValue::Hostname => {
                ConfigValue::String(resolver.hostname().map_err(DefaultsError::HostnameLookup)?)
            }
        })
    }
}

impl DefaultRule {
    /// Apply this rule; returns true if a value was written.
    pub fn apply<R: HostnameResolver + ?Sized>(
        &self,
        config: &mut BackendConfig,
        resolver: &R,
    ) -> Result<bool, DefaultsError> {
        if config
            .get_value(self.namespace, self.probe_component, self.probe_key)
            .is_some()
        {
            return Ok(false);
        }

        let value = self.value.resolve(resolver)?;
        tracing::debug!(
            namespace = %self.namespace,
            component = self.target_component,
            key = self.target_key,
            value = %value,
            "Applying configuration default"
        );
        config.set_value(self.namespace, self.target_component, self.target_key, value);
        Ok(true)
    }
}

impl BackendConfig {
    /// Fill in missing settings using the system host name.
    pub fn configure_defaults(&mut self) -> Result<(), DefaultsError> {
        self.configure_defaults_with(&SystemHostname)
    }

    /// Fill in missing settings; stops at the first failing rule and keeps
    /// whatever earlier rules already wrote.
    pub fn configure_defaults_with<R: HostnameResolver + ?Sized>(
        &mut self,
        resolver: &R,
    ) -> Result<(), DefaultsError> {
        for rule in DEFAULT_RULES {
            rule.apply(self, resolver)?;
        }
        Ok(())
    }
}
