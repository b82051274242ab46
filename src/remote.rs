//! Remote validation of expressions against an external authority.
//!
//! The engine owns no transport. A caller drives each expression field with
//! [`ExpressionField::edit`] on every change and [`ExpressionField::poll_remote`]
//! on a timer; once the input has been quiet for the debounce window a
//! [`RemoteTicket`] comes out, the caller sends its request however it likes
//! and hands the outcome back to [`ExpressionField::apply_remote`]. Each edit
//! bumps a per-field generation, and a ticket from an older generation is
//! discarded on arrival.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{validate_local, ConditionCatalog, Signal, ValidationResult, Value};

/// Quiescence window recommended before sending a remote validation.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// One selected indicator and its parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndicatorConfig {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: BTreeMap<String, Value>,
}

impl IndicatorConfig {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parameters: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RemoteRequest {
    pub indicators: Vec<IndicatorConfig>,
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RemoteResponse {
    pub is_valid: bool,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub error_message: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub error_position: Option<usize>,
}

impl RemoteResponse {
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_message: None,
            error_position: None,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            is_valid: false,
            error_message: Some(message.into()),
            error_position: position,
        }
    }
}

impl From<RemoteResponse> for ValidationResult {
    fn from(resp: RemoteResponse) -> Self {
        if resp.is_valid {
            return ValidationResult::valid();
        }
        let message = resp
            .error_message
            .unwrap_or_else(|| "rejected by remote validator".to_owned());
        ValidationResult::invalid(message, resp.error_position)
    }
}

/// Anything that kept the remote authority from answering. None of these say
/// anything about the expression itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("remote validator returned status {0}")]
    Status(u16),

    #[error("remote validation timed out")]
    Timeout,
}

/// A synchronous remote authority. Closures of the right shape implement it.
pub trait RemoteValidator {
    /// Validate one request.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when no verdict could be obtained.
    fn validate(&self, request: &RemoteRequest) -> Result<RemoteResponse, RemoteError>;
}

impl<F> RemoteValidator for F
where
    F: Fn(&RemoteRequest) -> Result<RemoteResponse, RemoteError>,
{
    fn validate(&self, request: &RemoteRequest) -> Result<RemoteResponse, RemoteError> {
        self(request)
    }
}

/// Validate `source` locally and, if it passes, remotely, in one blocking
/// call with no debounce.
///
/// A remote failure leaves the local verdict standing.
pub fn validate_remote<V>(
    validator: &V,
    source: &str,
    indicators: &[IndicatorConfig],
    catalog: &ConditionCatalog,
) -> ValidationResult
where
    V: RemoteValidator + ?Sized,
{
    let local = validate_local(source, catalog);
    if !local.is_valid() || source.trim().is_empty() {
        return local;
    }

    let request = RemoteRequest {
        indicators: indicators.to_vec(),
        expression: source.to_owned(),
    };
    match validator.validate(&request) {
        Ok(resp) => ValidationResult::from(resp),
        Err(err) => {
            tracing::warn!(error = %err, "remote validation failed; keeping local result");
            local
        }
    }
}

/// Per-field remote validation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldConfig {
    pub debounce: Duration,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl FieldConfig {
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

/// A remote validation the caller should send, tagged with the generation of
/// the text it was issued for.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteTicket {
    generation: u64,
    request: RemoteRequest,
}

impl RemoteTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn request(&self) -> &RemoteRequest {
        &self.request
    }
}

/// Validation state of one expression input.
#[derive(Debug, Clone, Default)]
pub struct ExpressionField {
    config: FieldConfig,
    generation: u64,
    source: String,
    edited_at: Option<Instant>,
    local: ValidationResult,
    current: ValidationResult,
    /// Generation for which a ticket is already out.
    issued: Option<u64>,
}

impl ExpressionField {
    #[must_use]
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replace the field's text and validate it locally.
    ///
    /// Identical text is a no-op, so a redundant change event neither bumps
    /// the generation nor restarts the debounce window.
    pub fn edit(
        &mut self,
        source: &str,
        now: Instant,
        catalog: &ConditionCatalog,
    ) -> &ValidationResult {
        if source == self.source {
            return &self.current;
        }

        self.source = source.to_owned();
        self.revalidate(now, catalog)
    }

    /// Validate the unchanged text again after the indicator selection or its
    /// parameters changed.
    ///
    /// Always bumps the generation and restarts the debounce window. A remote
    /// verdict for the old selection is dropped and tickets still in flight
    /// go stale.
    pub fn revalidate(&mut self, now: Instant, catalog: &ConditionCatalog) -> &ValidationResult {
        self.generation += 1;
        self.edited_at = Some(now);
        self.local = validate_local(&self.source, catalog);
        self.current = self.local.clone();
        &self.current
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Incremented on every edit that changes the text and on every
    /// [`revalidate`](Self::revalidate).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The verdict to show: the remote one if it has landed for the current
    /// text, otherwise the local one.
    #[must_use]
    pub fn result(&self) -> &ValidationResult {
        &self.current
    }

    #[must_use]
    pub fn local_result(&self) -> &ValidationResult {
        &self.local
    }

    #[must_use]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// `true` once the debounce window has elapsed since the last edit.
    #[must_use]
    pub fn is_quiescent(&self, now: Instant) -> bool {
        self.edited_at
            .map_or(true, |at| now.saturating_duration_since(at) >= self.config.debounce)
    }

    /// Issue a remote validation for the current text if it is due.
    ///
    /// Returns `None` while the input is still settling, when the text is
    /// blank or fails locally, or when a ticket for this generation was
    /// already issued.
    pub fn poll_remote(
        &mut self,
        now: Instant,
        indicators: &[IndicatorConfig],
    ) -> Option<RemoteTicket> {
        if self.issued == Some(self.generation)
            || !self.local.is_valid()
            || self.source.trim().is_empty()
            || !self.is_quiescent(now)
        {
            return None;
        }

        self.issued = Some(self.generation);
        tracing::debug!(
            generation = self.generation,
            source = %self.source,
            "remote validation issued"
        );
        Some(RemoteTicket {
            generation: self.generation,
            request: RemoteRequest {
                indicators: indicators.to_vec(),
                expression: self.source.clone(),
            },
        })
    }

    /// Apply the outcome of a ticket's request. Returns whether the visible
    /// result changed.
    ///
    /// A ticket issued for older text is dropped. A failure is logged and the
    /// local result is restored.
    pub fn apply_remote(
        &mut self,
        ticket: &RemoteTicket,
        outcome: Result<RemoteResponse, RemoteError>,
    ) -> bool {
        if ticket.generation != self.generation || ticket.request.expression != self.source {
            tracing::debug!(
                ticket = ticket.generation,
                generation = self.generation,
                "discarding stale remote response"
            );
            return false;
        }

        let next = match outcome {
            Ok(resp) => ValidationResult::from(resp),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    generation = self.generation,
                    "remote validation failed; keeping local result"
                );
                self.local.clone()
            }
        };

        let changed = next != self.current;
        self.current = next;
        changed
    }

    /// Poll, send through `validator`, and apply, all in one step. Returns
    /// whether the visible result changed.
    pub fn validate_remote<V>(
        &mut self,
        validator: &V,
        now: Instant,
        indicators: &[IndicatorConfig],
    ) -> bool
    where
        V: RemoteValidator + ?Sized,
    {
        match self.poll_remote(now, indicators) {
            Some(ticket) => {
                let outcome = validator.validate(ticket.request());
                self.apply_remote(&ticket, outcome)
            }
            None => false,
        }
    }
}

/// The three expression inputs of a strategy, each with its own generation
/// counter and debounce timer.
#[derive(Debug, Clone, Default)]
pub struct SignalFields {
    fields: [ExpressionField; 3],
}

impl SignalFields {
    #[must_use]
    pub fn new(config: FieldConfig) -> Self {
        Self {
            fields: [
                ExpressionField::new(config),
                ExpressionField::new(config),
                ExpressionField::new(config),
            ],
        }
    }

    #[must_use]
    pub fn field(&self, signal: Signal) -> &ExpressionField {
        &self.fields[signal.index()]
    }

    pub fn field_mut(&mut self, signal: Signal) -> &mut ExpressionField {
        &mut self.fields[signal.index()]
    }

    pub fn edit(
        &mut self,
        signal: Signal,
        source: &str,
        now: Instant,
        catalog: &ConditionCatalog,
    ) -> &ValidationResult {
        self.field_mut(signal).edit(source, now, catalog)
    }

    /// Revalidate all three fields after the indicator selection changed.
    pub fn revalidate(&mut self, now: Instant, catalog: &ConditionCatalog) {
        for field in &mut self.fields {
            field.revalidate(now, catalog);
        }
    }

    /// Tickets for every field that is due.
    pub fn poll_remote(
        &mut self,
        now: Instant,
        indicators: &[IndicatorConfig],
    ) -> Vec<(Signal, RemoteTicket)> {
        Signal::ALL
            .iter()
            .filter_map(|&signal| {
                self.field_mut(signal)
                    .poll_remote(now, indicators)
                    .map(|ticket| (signal, ticket))
            })
            .collect()
    }

    pub fn apply_remote(
        &mut self,
        signal: Signal,
        ticket: &RemoteTicket,
        outcome: Result<RemoteResponse, RemoteError>,
    ) -> bool {
        self.field_mut(signal).apply_remote(ticket, outcome)
    }

    /// `true` when no field currently shows an error. Blank fields count as
    /// valid.
    #[must_use]
    pub fn all_valid(&self) -> bool {
        self.fields.iter().all(|f| f.result().is_valid())
    }
}
