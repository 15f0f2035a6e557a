//! Decode container: the resumable state of one in-flight message
//!
//! A container is fed the bytes of one message in arrival order, in as many
//! pieces as the transport delivers. Its fields are the whole resumption
//! context: a partially received header or value is kept until the next call.
//!
//! A container is owned by exactly one decode and is never shared between
//! threads. Once it has reported a complete message or an error it must be
//! dropped.

use log::{debug, error, trace};

use crate::ber::{parse_header, Header, HeaderParse, MAX_HEADER_LEN};
use crate::config::DecoderConfig;
use crate::grammar::{ActionContext, Grammar, GrammarAction, GrammarState, Transition, TransitionKind};
use crate::krb5_errors::{DecodeError, DecodeErrorKind};
use crate::tlv::Tlv;

/// Length budget of one constructed TLV the grammar descended into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestingFrame<S> {
    offset: usize,
    declared: usize,
    remaining: usize,
    close: S,
}

impl<S: Copy> NestingFrame<S> {
    /// Absolute offset of the constructed TLV
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn declared_length(&self) -> usize {
        self.declared
    }

    /// Bytes of child TLVs (headers included) seen so far
    pub fn consumed(&self) -> usize {
        self.declared - self.remaining
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// State restored when the budget is exhausted
    pub fn return_state(&self) -> S {
        self.close
    }
}

/// Result of one [`Asn1Container::advance`] call
#[derive(Debug, PartialEq)]
pub enum Outcome<T> {
    /// All the input was consumed; at least this many more bytes are needed
    NeedMore(usize),
    /// A grammar transition was taken and the object was updated
    Transition,
    /// The message is complete
    Complete(T),
}

#[derive(Debug, PartialEq)]
pub struct Step<T> {
    /// Bytes of the input used by this call
    pub consumed: usize,
    pub outcome: Outcome<T>,
}

struct Pending<'g, T, S> {
    tlv: Tlv,
    transition: &'g Transition<T, S>,
}

pub struct Asn1Container<'g, T, S> {
    grammar: &'g Grammar<T, S>,
    config: DecoderConfig,
    state: S,
    object: T,
    header: Vec<u8>,
    needed: usize,
    pending: Option<Pending<'g, T, S>>,
    frames: Vec<NestingFrame<S>>,
    end_allowed: bool,
    finished: bool,
    base_offset: usize,
    offset: usize,
    tlv_offset: usize,
    depth_base: usize,
}

impl<'g, T: Default, S: GrammarState> Asn1Container<'g, T, S> {
    pub fn new(grammar: &'g Grammar<T, S>, config: DecoderConfig) -> Self {
        Self::embedded(grammar, config, 0, 0)
    }

    /// Container for a structure nested `depth_base` constructed TLVs deep,
    /// whose first byte is at absolute offset `base_offset`
    pub(crate) fn embedded(grammar: &'g Grammar<T, S>, config: DecoderConfig, depth_base: usize, base_offset: usize) -> Self {
        Asn1Container {
            grammar,
            config,
            state: grammar.initial_state(),
            object: T::default(),
            header: Vec::with_capacity(MAX_HEADER_LEN),
            needed: 1,
            pending: None,
            frames: Vec::new(),
            end_allowed: false,
            finished: false,
            base_offset,
            offset: base_offset,
            tlv_offset: base_offset,
            depth_base,
        }
    }

    pub fn grammar(&self) -> &'g Grammar<T, S> {
        self.grammar
    }

    pub fn state(&self) -> S {
        self.state
    }

    /// Open constructed TLVs, outermost first
    pub fn frames(&self) -> &[NestingFrame<S>] {
        &self.frames
    }

    /// TLV whose value is being read, if any
    pub fn current_tlv(&self) -> Option<&Tlv> {
        self.pending.as_ref().map(|p| &p.tlv)
    }

    /// Whether the current state is one where the grammar allows the
    /// innermost open structure to end
    pub fn is_end_allowed(&self) -> bool {
        self.end_allowed
    }

    /// Total bytes consumed since the start of the message
    pub fn consumed(&self) -> usize {
        self.offset - self.base_offset
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feed the next bytes of the message
    ///
    /// Stops after the first grammar transition, after the message is
    /// complete, or when `input` is exhausted. Bytes not reported as consumed
    /// belong to the rest of the message (or, after `Complete`, to whatever
    /// follows it) and must be fed again.
    pub fn advance(&mut self, input: &[u8]) -> Result<Step<T>, DecodeError> {
        if self.finished {
            return Err(DecodeError::new(DecodeErrorKind::ContainerFinished));
        }
        match self.step(input) {
            Ok(step) => {
                if let Outcome::Complete(_) = step.outcome {
                    debug!("{}: complete after {} bytes", self.grammar.name(), self.consumed());
                    self.finished = true;
                }
                Ok(step)
            }
            Err(e) => {
                self.finished = true;
                let e = if e.offset().is_none() { e.at(self.tlv_offset) } else { e };
                error!("{}: decoding failed in state {:?}: {}", self.grammar.name(), self.state, e);
                Err(e)
            }
        }
    }

    fn step(&mut self, input: &[u8]) -> Result<Step<T>, DecodeError> {
        let mut pos = 0;
        loop {
            if let Some(ref mut pending) = self.pending {
                let used = pending.tlv.fill(&input[pos..]);
                pos += used;
                self.offset += used;
                if !pending.tlv.is_complete() {
                    let remaining = pending.tlv.remaining();
                    return Ok(Step {
                        consumed: pos,
                        outcome: Outcome::NeedMore(remaining),
                    });
                }
                let outcome = match self.pending.take() {
                    Some(Pending { tlv, transition }) => self.complete_tlv(transition, tlv)?,
                    None => Outcome::Transition,
                };
                return Ok(Step { consumed: pos, outcome });
            }

            if pos == input.len() {
                return Ok(Step {
                    consumed: pos,
                    outcome: Outcome::NeedMore(self.needed),
                });
            }
            if self.header.is_empty() {
                self.tlv_offset = self.offset;
            }
            let seen = self.header.len();
            let take = (input.len() - pos).min(MAX_HEADER_LEN - seen);
            self.header.extend_from_slice(&input[pos..pos + take]);
            match parse_header(&self.header) {
                HeaderParse::Parsed(header) => {
                    let used = header.header_len - seen;
                    pos += used;
                    self.offset += used;
                    self.header.truncate(header.header_len);
                    let header_bytes = std::mem::take(&mut self.header);
                    self.needed = 1;
                    if let Some(outcome) = self.start_tlv(header, &header_bytes)? {
                        return Ok(Step { consumed: pos, outcome });
                    }
                }
                HeaderParse::NeedMore(n) => {
                    pos += take;
                    self.offset += take;
                    if self.header.len() >= MAX_HEADER_LEN {
                        return Err(DecodeError::new(DecodeErrorKind::MalformedLength)
                            .with_context("header longer than any valid encoding"));
                    }
                    if let Some(frame) = self.frames.last() {
                        if self.header.len() >= frame.remaining {
                            return Err(DecodeError::new(DecodeErrorKind::NestingBudgetViolation).with_context(format!(
                                "header needs more than the {} bytes left in the constructed value at offset {}",
                                frame.remaining, frame.offset
                            )));
                        }
                    }
                    self.needed = n;
                }
                HeaderParse::Malformed(kind) => {
                    return Err(DecodeError::new(kind).with_context(format!("header bytes {:02x?}", self.header)));
                }
            }
        }
    }

    /// Account for a new TLV and look its transition up
    ///
    /// Returns an outcome for TLVs the grammar descends into, `None` when the
    /// value must be read first.
    fn start_tlv(&mut self, header: Header, header_bytes: &[u8]) -> Result<Option<Outcome<T>>, DecodeError> {
        let total = header
            .header_len
            .checked_add(header.length)
            .ok_or_else(|| DecodeError::new(DecodeErrorKind::MalformedLength))?;
        trace!(
            "{}: {:?} length {} at offset {}",
            self.grammar.name(),
            header.tag,
            header.length,
            self.tlv_offset
        );
        match self.frames.last_mut() {
            Some(frame) => {
                if total > frame.remaining {
                    return Err(DecodeError::new(DecodeErrorKind::NestingBudgetViolation).with_context(format!(
                        "{:?} of {} bytes overruns the {} bytes left in the constructed value at offset {}",
                        header.tag, total, frame.remaining, frame.offset
                    )));
                }
                frame.remaining -= total;
            }
            None if self.depth_base == 0 && total > self.config.max_pdu_size => {
                return Err(DecodeError::new(DecodeErrorKind::LengthLimitExceeded).with_context(format!(
                    "message of {} bytes, limit is {}",
                    total, self.config.max_pdu_size
                )));
            }
            None => (),
        }

        let grammar = self.grammar;
        let transition = match grammar.transition(self.state, header.tag) {
            Some(t) => t,
            None => {
                let expected: Vec<_> = grammar.expected_tags(self.state).collect();
                return Err(DecodeError::new(DecodeErrorKind::UnexpectedTag).with_context(format!(
                    "{:?} in state {:?}, expected one of {:?}",
                    header.tag, self.state, expected
                )));
            }
        };

        let depth = self.depth_base + self.frames.len();
        match transition.kind() {
            TransitionKind::Enter { close } => {
                if depth + 1 > self.config.max_nesting_depth {
                    return Err(DecodeError::new(DecodeErrorKind::NestingDepthExceeded).with_context(format!(
                        "{:?} would open level {}, limit is {}",
                        header.tag,
                        depth + 1,
                        self.config.max_nesting_depth
                    )));
                }
                let tlv = Tlv::boundary(header, self.tlv_offset, depth);
                if let Some(action) = transition.action() {
                    self.run_action(action, &tlv)?;
                }
                debug!(
                    "{}: {:?} --{:?}--> {:?}",
                    grammar.name(),
                    self.state,
                    header.tag,
                    transition.to_state()
                );
                self.frames.push(NestingFrame {
                    offset: self.tlv_offset,
                    declared: header.length,
                    remaining: header.length,
                    close,
                });
                self.state = transition.to_state();
                self.close_frames()?;
                Ok(Some(self.settle()))
            }
            TransitionKind::Read => {
                if header.length > self.config.max_value_length {
                    return Err(DecodeError::new(DecodeErrorKind::LengthLimitExceeded).with_context(format!(
                        "{:?} value of {} bytes, limit is {}",
                        header.tag, header.length, self.config.max_value_length
                    )));
                }
                self.pending = Some(Pending {
                    tlv: Tlv::materialized(header, header_bytes, self.tlv_offset, depth),
                    transition,
                });
                Ok(None)
            }
        }
    }

    fn complete_tlv(&mut self, transition: &'g Transition<T, S>, tlv: Tlv) -> Result<Outcome<T>, DecodeError> {
        if let Some(action) = transition.action() {
            self.run_action(action, &tlv)?;
        }
        debug!(
            "{}: {:?} --{:?}--> {:?}",
            self.grammar.name(),
            self.state,
            tlv.tag(),
            transition.to_state()
        );
        self.state = transition.to_state();
        self.close_frames()?;
        Ok(self.settle())
    }

    fn run_action(&mut self, action: &dyn GrammarAction<T>, tlv: &Tlv) -> Result<(), DecodeError> {
        let ctx = ActionContext::new(tlv, &self.config, self.depth_base + self.frames.len());
        trace!("{}: action {}", self.grammar.name(), action.description());
        action
            .apply(&ctx, &mut self.object)
            .map_err(|e| e.in_field(action.description()))
    }

    /// Pop every frame whose budget is exhausted
    fn close_frames(&mut self) -> Result<(), DecodeError> {
        while let Some(frame) = self.frames.last() {
            if frame.remaining > 0 {
                break;
            }
            if !self.grammar.is_end_allowed(self.state) {
                return Err(DecodeError::new(DecodeErrorKind::IncompleteStructure).with_context(format!(
                    "{} value at offset {} ended in state {:?}",
                    self.grammar.name(),
                    frame.offset,
                    self.state
                )));
            }
            self.state = frame.close;
            self.frames.pop();
        }
        self.end_allowed = self.grammar.is_end_allowed(self.state);
        Ok(())
    }

    fn settle(&mut self) -> Outcome<T> {
        if self.frames.is_empty() && self.end_allowed {
            Outcome::Complete(std::mem::take(&mut self.object))
        } else {
            Outcome::Transition
        }
    }
}
