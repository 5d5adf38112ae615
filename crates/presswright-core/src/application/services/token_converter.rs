//! Resolves `[kind|payload]` tokens in configuration values.

use std::path::Path;

use tracing::{debug, instrument};

use crate::{
    application::services::executor::CommandExecutor,
    domain::{Eval, Message, Token, TokenKind, WpCommand},
    error::PresswrightResult,
};

/// Replaces tokens using wp-cli as the formatter.
#[derive(Clone)]
pub struct TokenConverter {
    executor: CommandExecutor,
}

impl TokenConverter {
    pub fn new(executor: CommandExecutor) -> Self {
        Self { executor }
    }

    /// Resolve every token in `value`.
    ///
    /// Values without tokens come back unchanged and cost no wp-cli call.
    /// `date` tokens are formatted with `wp eval` scoped to `wordpress_path`;
    /// unknown kinds stay as literal text. A `date` whose evaluation fails
    /// is also left as written.
    #[instrument(skip_all, fields(value = %value))]
    pub fn convert_token(
        &self,
        value: &str,
        wordpress_path: &Path,
        debug: bool,
    ) -> PresswrightResult<String> {
        let tokens = Token::find_all(value);
        if tokens.is_empty() {
            return Ok(value.to_string());
        }

        let mut converted = String::with_capacity(value.len());
        let mut cursor = 0;
        for token in tokens {
            converted.push_str(&value[cursor..token.span.start]);
            let literal = &value[token.span.clone()];
            match self.resolve(&token, literal, wordpress_path, debug)? {
                Some(replacement) => converted.push_str(&replacement),
                None => converted.push_str(literal),
            }
            cursor = token.span.end;
        }
        converted.push_str(&value[cursor..]);

        debug!(converted = %converted, "Token converted");
        Ok(converted)
    }

    fn resolve(
        &self,
        token: &Token,
        literal: &str,
        wordpress_path: &Path,
        debug: bool,
    ) -> PresswrightResult<Option<String>> {
        match &token.kind {
            // The payload is spliced into a PHP string literal.
            TokenKind::Date if token.payload.contains('\'') => {
                self.executor.reporter().warning(&Message::UnsafeTokenPayload {
                    token: literal.to_string(),
                });
                Ok(None)
            }
            TokenKind::Date => {
                let output = self.executor.execute(WpCommand::Eval(Eval::date(
                    wordpress_path.to_path_buf(),
                    &token.payload,
                    debug,
                )))?;
                Ok(output.success().then(|| output.stdout.trim().to_string()))
            }
            TokenKind::Unknown(_) => {
                self.executor.reporter().warning(&Message::UnknownToken {
                    token: literal.to_string(),
                });
                Ok(None)
            }
        }
    }
}
