//! Template expansion engine
//!
//! Expands every string leaf of a template through a bounded fixpoint
//! loop. One [`VariableContext`] is threaded through the whole traversal in
//! source order, so a `set` in one leaf is visible to every later leaf.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use ile_domain::{
    Expression, GenerationId, TemplateInput, TenantId, VariableContext, VarsBlock,
};

use super::functions::{self, Builtin};
use super::parser::{is_call, parse_expression, unquote};
use super::span::{find_spans, has_expression};
use crate::ports::{ImageRepository, RandomSource, RepositoryError, RuleTableRepository};

/// Hard cap on evaluation passes per string.
pub const MAX_PASSES: usize = 100;

/// Errors that abort a template expansion.
///
/// Malformed or unresolvable template content never produces one; only a
/// failing repository does.
#[derive(Debug, thiserror::Error)]
pub enum IleError {
    /// A table or image lookup failed in storage.
    #[error("lookup failed: {0}")]
    Lookup(#[from] RepositoryError),
}

/// Result type alias for template expansion.
pub type IleResult<T> = Result<T, IleError>;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Per-invocation evaluation state.
struct Session<'c> {
    context: &'c mut VariableContext,
    deadline: Option<Instant>,
    expired: bool,
}

impl<'c> Session<'c> {
    fn new(context: &'c mut VariableContext, timeout: Option<Duration>) -> Self {
        Self {
            context,
            deadline: timeout.map(|t| Instant::now() + t),
            expired: false,
        }
    }

    /// Awaits a lookup unless the deadline has passed.
    ///
    /// After expiry every lookup yields `None` without being awaited.
    async fn guard<T>(
        &mut self,
        lookup: impl Future<Output = Result<T, RepositoryError>> + Send,
    ) -> Result<Option<T>, RepositoryError> {
        if self.expired {
            return Ok(None);
        }
        let Some(deadline) = self.deadline else {
            return lookup.await.map(Some);
        };
        if let Ok(result) = tokio::time::timeout_at(deadline, lookup).await {
            result.map(Some)
        } else {
            self.expired = true;
            warn!(
                tenant = %self.context.tenant_id(),
                "expansion deadline passed; remaining lookups expand to nothing"
            );
            Ok(None)
        }
    }
}

/// Expands `${...}` expressions in reply templates.
///
/// The engine holds no per-invocation state; each call to
/// [`process_messages`](Self::process_messages) builds its own context.
pub struct TemplateEngine<T: ?Sized, I: ?Sized, R: ?Sized> {
    tables: Arc<T>,
    images: Arc<I>,
    random: Arc<R>,
    max_passes: usize,
    timeout: Option<Duration>,
}

impl<T, I, R> TemplateEngine<T, I, R>
where
    T: RuleTableRepository + ?Sized,
    I: ImageRepository + ?Sized,
    R: RandomSource + ?Sized,
{
    /// Creates an engine over the given ports, with no deadline.
    #[must_use]
    pub fn new(tables: Arc<T>, images: Arc<I>, random: Arc<R>) -> Self {
        Self {
            tables,
            images,
            random,
            max_passes: MAX_PASSES,
            timeout: None,
        }
    }

    /// Lowers the per-string pass cap. Values above [`MAX_PASSES`] are clamped.
    #[must_use]
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.min(MAX_PASSES);
        self
    }

    /// Bounds the time spent awaiting lookups in one invocation.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The per-string pass cap in effect.
    #[must_use]
    pub const fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Expands a stored template for `tenant`.
    ///
    /// Accepts a bare message array or a `{__vars__, __messages__}`
    /// envelope; any other shape expands to no messages.
    ///
    /// # Errors
    /// Returns [`IleError::Lookup`] if a repository fails.
    pub async fn process_messages(&self, input: &Value, tenant: &TenantId) -> IleResult<Vec<Value>> {
        let mut context = VariableContext::new(tenant.clone());
        self.process_with_context(input, &mut context).await
    }

    /// Like [`process_messages`](Self::process_messages), but leaves the
    /// final variable bindings in `context`.
    ///
    /// # Errors
    /// Returns [`IleError::Lookup`] if a repository fails.
    pub async fn process_with_context(
        &self,
        input: &Value,
        context: &mut VariableContext,
    ) -> IleResult<Vec<Value>> {
        let mut session = Session::new(context, self.timeout);
        match TemplateInput::classify(input) {
            TemplateInput::Messages(messages) => self.walk_all(messages, &mut session).await,
            TemplateInput::Envelope(envelope) => {
                self.seed(&envelope.vars, &mut session).await?;
                match envelope.messages {
                    Some(messages) => self.walk_all(messages, &mut session).await,
                    None => {
                        debug!("envelope has no message array");
                        Ok(Vec::new())
                    }
                }
            }
            TemplateInput::Unsupported => {
                debug!("unsupported template shape");
                Ok(Vec::new())
            }
        }
    }

    /// Expands a single string against `context`.
    ///
    /// # Errors
    /// Returns [`IleError::Lookup`] if a repository fails.
    pub async fn evaluate_str(&self, text: &str, context: &mut VariableContext) -> IleResult<String> {
        let mut session = Session::new(context, self.timeout);
        self.evaluate(text, &mut session).await
    }

    async fn seed(&self, vars: &VarsBlock<'_>, session: &mut Session<'_>) -> IleResult<()> {
        if !vars.is_ordered() && vars.bindings().len() > 1 {
            debug!("binding object-form __vars__ in document order");
        }
        for binding in vars.bindings() {
            if !binding.ignored_keys.is_empty() {
                warn!(
                    variable = binding.name,
                    ignored = ?binding.ignored_keys,
                    "__vars__ element has several keys; only the first is bound"
                );
            }
            let value = self.walk(binding.value, session).await?;
            trace!(variable = binding.name, value = %value, "bound");
            session.context.set(binding.name, value);
        }
        Ok(())
    }

    async fn walk_all(&self, messages: &[Value], session: &mut Session<'_>) -> IleResult<Vec<Value>> {
        let mut out = Vec::with_capacity(messages.len());
        for message in messages {
            out.push(self.walk(message, session).await?);
        }
        Ok(out)
    }

    /// Expands every string leaf of `value` in source order.
    fn walk<'a, 'c: 'a>(
        &'a self,
        value: &'a Value,
        session: &'a mut Session<'c>,
    ) -> BoxFuture<'a, IleResult<Value>> {
        Box::pin(async move {
            Ok(match value {
                Value::String(text) => Value::String(self.evaluate(text, session).await?),
                Value::Array(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for item in items {
                        out.push(self.walk(item, &mut *session).await?);
                    }
                    Value::Array(out)
                }
                Value::Object(object) => {
                    let mut out = Map::with_capacity(object.len());
                    for (key, item) in object {
                        out.insert(key.clone(), self.walk(item, &mut *session).await?);
                    }
                    Value::Object(out)
                }
                other => other.clone(),
            })
        })
    }

    /// The fixpoint loop over one string.
    fn evaluate<'a, 'c: 'a>(
        &'a self,
        text: &'a str,
        session: &'a mut Session<'c>,
    ) -> BoxFuture<'a, IleResult<String>> {
        Box::pin(async move {
            let mut current = text.to_string();
            for pass in 1..=self.max_passes {
                if !has_expression(&current) {
                    break;
                }
                let spans = find_spans(&current);
                if spans.is_empty() {
                    break;
                }
                let expressions: Vec<Expression> =
                    spans.iter().map(|s| parse_expression(&s.content)).collect();

                // Arguments resolve left to right; nested `set`s commit here.
                let mut arguments = Vec::with_capacity(expressions.len());
                for expression in &expressions {
                    arguments.push(match expression {
                        Expression::Call { args, .. } => {
                            self.resolve_arguments(args, &mut *session).await?
                        }
                        _ => Vec::new(),
                    });
                }

                // Top-level assignments commit before anything else in the pass reads.
                let mut replacements = vec![String::new(); spans.len()];
                for (expression, args) in expressions.iter().zip(&arguments) {
                    if expression.is_assignment() {
                        self.dispatch(expression, args, &mut *session).await?;
                    }
                }
                for ((slot, expression), args) in
                    replacements.iter_mut().zip(&expressions).zip(&arguments)
                {
                    if !expression.is_assignment() {
                        *slot = self.dispatch(expression, args, &mut *session).await?;
                    }
                }

                let mut next = current.clone();
                for (span, replacement) in spans.iter().zip(&replacements).rev() {
                    trace!(span = %span.raw, value = %replacement, "substitute");
                    next.replace_range(span.range(), replacement);
                }

                if next == current {
                    debug!(pass, "no progress; stopping");
                    break;
                }
                current = next;
                if pass == self.max_passes && has_expression(&current) {
                    warn!(
                        passes = self.max_passes,
                        "pass cap reached; returning partial result"
                    );
                }
            }
            Ok(current)
        })
    }

    /// Applies one parsed span; `args` are the call's already resolved arguments.
    async fn dispatch(
        &self,
        expression: &Expression,
        args: &[String],
        session: &mut Session<'_>,
    ) -> IleResult<String> {
        match expression {
            Expression::Call { name, .. } => {
                match Builtin::from_name(name) {
                    Some(builtin) if builtin.accepts(args.len()) => {
                        self.call(builtin, args, session).await
                    }
                    Some(_) => {
                        trace!(function = %name, count = args.len(), "wrong argument count");
                        Ok(String::new())
                    }
                    None => {
                        trace!(function = %name, "unknown function");
                        Ok(String::new())
                    }
                }
            }
            Expression::RandShorthand { min, max } => {
                Ok(functions::random_between(self.random.as_ref(), *min, *max))
            }
            Expression::VarRef { name } => Ok(session.context.lookup_text(name)),
        }
    }

    async fn resolve_arguments(
        &self,
        args: &[String],
        session: &mut Session<'_>,
    ) -> IleResult<Vec<String>> {
        let mut resolved = Vec::with_capacity(args.len());
        for arg in args {
            let unquoted = unquote(arg);
            let value = if has_expression(unquoted) {
                self.evaluate(unquoted, &mut *session).await?
            } else if is_call(unquoted) {
                let wrapped = format!("${{{unquoted}}}");
                self.evaluate(&wrapped, &mut *session).await?
            } else {
                unquoted.to_string()
            };
            trace!(arg = %arg, value = %value, "argument resolved");
            resolved.push(value);
        }
        Ok(resolved)
    }

    async fn call(
        &self,
        builtin: Builtin,
        args: &[String],
        session: &mut Session<'_>,
    ) -> IleResult<String> {
        match (builtin, args) {
            (Builtin::Set, [key, value]) => {
                session.context.set(key.as_str(), value.as_str());
                Ok(String::new())
            }
            (Builtin::Rand, [min, max]) => {
                Ok(functions::random_from_text(self.random.as_ref(), min, max))
            }
            (Builtin::Tbl, [row, field]) => self.table_value(None, row, field, session).await,
            (Builtin::Tbl, [generation, row, field]) => {
                let generation = Some(generation.as_str()).filter(|g| !g.trim().is_empty());
                self.table_value(generation, row, field, session).await
            }
            (Builtin::GetName, [prefix, suffix]) => Ok(functions::image_name(prefix, suffix)),
            (Builtin::GetUrl, [name]) => self.image_url(name, session).await,
            (Builtin::ImgConv, [prefix, suffix]) => {
                let name = functions::image_name(prefix, suffix);
                self.image_url(&name, session).await
            }
            _ => Ok(String::new()),
        }
    }

    async fn table_value(
        &self,
        generation: Option<&str>,
        row: &str,
        field: &str,
        session: &mut Session<'_>,
    ) -> IleResult<String> {
        let Some(row) = functions::parse_integer_prefix(row) else {
            return Ok(String::new());
        };
        if field.is_empty() {
            return Ok(String::new());
        }

        let tenant = session.context.tenant_id().clone();
        let generation = match generation {
            Some(id) => GenerationId::from(id),
            None => {
                let latest = session
                    .guard(self.tables.latest_active_generation(&tenant))
                    .await?;
                let Some(id) = latest.flatten() else {
                    trace!(tenant = %tenant, "no active generation");
                    return Ok(String::new());
                };
                id
            }
        };

        let value = session
            .guard(self.tables.field_value(&tenant, &generation, row, field))
            .await?;
        Ok(value.flatten().unwrap_or_default())
    }

    async fn image_url(&self, name: &str, session: &mut Session<'_>) -> IleResult<String> {
        if name.is_empty() {
            return Ok(String::new());
        }
        let tenant = session.context.tenant_id().clone();
        let url = session
            .guard(self.images.image_url_by_name(&tenant, name))
            .await?;
        Ok(url.flatten().unwrap_or_default())
    }
}
