//! Decoding drivers
//!
//! [`decode`] decodes one message from a complete buffer. [`StreamDecoder`]
//! decodes a sequence of messages from a byte stream delivered in arbitrary
//! pieces, resuming where the previous call stopped.

use log::{debug, warn};

use crate::config::DecoderConfig;
use crate::container::{Asn1Container, Outcome};
use crate::grammar::{Decodable, Grammar, GrammarState};
use crate::krb5_errors::{DecodeError, DecodeErrorKind};

/// Decode one message from the start of `input`
///
/// Returns the remaining input and the decoded object. A message that is
/// truncated fails with [`DecodeErrorKind::Incomplete`].
pub fn decode<'a, T, S>(grammar: &Grammar<T, S>, config: &DecoderConfig, input: &'a [u8]) -> Result<(&'a [u8], T), DecodeError>
where
    T: Default,
    S: GrammarState,
{
    let mut container = Asn1Container::new(grammar, config.clone());
    let mut pos = 0;
    loop {
        let step = container.advance(&input[pos..])?;
        pos += step.consumed;
        match step.outcome {
            Outcome::Complete(object) => return Ok((&input[pos..], object)),
            Outcome::Transition => (),
            Outcome::NeedMore(n) => {
                return Err(DecodeError::new(DecodeErrorKind::Incomplete)
                    .at(pos)
                    .with_context(format!("{}: {} more bytes needed", grammar.name(), n)));
            }
        }
    }
}

/// Decode `bytes`, which must hold exactly one encoding of `U`
///
/// Used for structures embedded in the value of an enclosing TLV. The bytes
/// are already bounded by the enclosing length, so running short or leaving
/// bytes unused is a budget violation.
pub(crate) fn decode_embedded<U: Decodable>(
    grammar: &Grammar<U, U::State>,
    config: &DecoderConfig,
    bytes: &[u8],
    depth_base: usize,
    base_offset: usize,
) -> Result<U, DecodeError> {
    let mut container = Asn1Container::embedded(grammar, config.clone(), depth_base, base_offset);
    let mut pos = 0;
    loop {
        let step = container.advance(&bytes[pos..])?;
        pos += step.consumed;
        match step.outcome {
            Outcome::Complete(object) if pos == bytes.len() => return Ok(object),
            Outcome::Complete(_) => {
                return Err(DecodeError::new(DecodeErrorKind::NestingBudgetViolation)
                    .at(base_offset + pos)
                    .with_context(format!(
                        "{} bytes left after {}",
                        bytes.len() - pos,
                        grammar.name()
                    )));
            }
            Outcome::Transition => (),
            Outcome::NeedMore(_) => {
                return Err(DecodeError::new(DecodeErrorKind::NestingBudgetViolation)
                    .at(base_offset + pos)
                    .with_context(format!("{} truncated by the enclosing value", grammar.name())));
            }
        }
    }
}

/// Result of one [`StreamDecoder::decode`] call
#[derive(Debug, PartialEq)]
pub enum Decoded<T> {
    /// All the input was consumed; at least this many more bytes are needed
    NeedMore(usize),
    /// A message was decoded from the first `consumed` bytes of the input;
    /// the rest must be fed again
    Message { consumed: usize, message: T },
}

/// Incremental decoder for a stream of messages of one type
///
/// Each message gets a fresh container. After an error the partial message is
/// dropped and the next call starts a new message.
pub struct StreamDecoder<'g, T, S> {
    grammar: &'g Grammar<T, S>,
    config: DecoderConfig,
    container: Option<Asn1Container<'g, T, S>>,
}

impl<'g, T: Default, S: GrammarState> StreamDecoder<'g, T, S> {
    pub fn new(grammar: &'g Grammar<T, S>, config: DecoderConfig) -> Self {
        StreamDecoder {
            grammar,
            config,
            container: None,
        }
    }

    /// Feed the next bytes of the stream
    pub fn decode(&mut self, input: &[u8]) -> Result<Decoded<T>, DecodeError> {
        let grammar = self.grammar;
        let config = &self.config;
        let container = self
            .container
            .get_or_insert_with(|| Asn1Container::new(grammar, config.clone()));
        let mut pos = 0;
        loop {
            let step = match container.advance(&input[pos..]) {
                Ok(step) => step,
                Err(e) => {
                    self.container = None;
                    return Err(e);
                }
            };
            pos += step.consumed;
            match step.outcome {
                Outcome::Complete(message) => {
                    self.container = None;
                    return Ok(Decoded::Message { consumed: pos, message });
                }
                Outcome::Transition => (),
                Outcome::NeedMore(n) => {
                    debug!("{}: waiting for {} more bytes", grammar.name(), n);
                    return Ok(Decoded::NeedMore(n));
                }
            }
        }
    }

    /// Whether no message is in progress
    pub fn is_idle(&self) -> bool {
        match self.container {
            Some(ref c) => c.consumed() == 0,
            None => true,
        }
    }

    /// Signal the end of the stream
    ///
    /// Fails with [`DecodeErrorKind::Incomplete`] if a message was started but
    /// not completed.
    pub fn finish(self) -> Result<(), DecodeError> {
        match self.container {
            Some(ref c) if c.consumed() > 0 => {
                warn!(
                    "{}: stream ended after {} bytes of a message",
                    self.grammar.name(),
                    c.consumed()
                );
                Err(DecodeError::new(DecodeErrorKind::Incomplete)
                    .at(c.consumed())
                    .with_context(format!("{} truncated", self.grammar.name())))
            }
            _ => Ok(()),
        }
    }
}
