//! Grammars: per-message-type transition tables
//!
//! A grammar maps `(state, tag)` to a transition. States mirror the position
//! inside the structure being decoded ("which field is expected next"); when a
//! field is optional, or belongs to a SEQUENCE OF, the same state has several
//! outgoing tags.
//!
//! Grammars are built once, are immutable, and are shared by reference by all
//! the containers decoding the same message type.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::ber::Tag;
use crate::config::DecoderConfig;
use crate::decoder::decode_embedded;
use crate::krb5_errors::{DecodeError, DecodeErrorKind};
use crate::tlv::Tlv;

/// Requirements on the state type of a grammar
pub trait GrammarState: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

impl<S> GrammarState for S where S: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

/// A domain object decodable with a grammar of its own
///
/// Nested structures are decoded through the grammar of their type.
pub trait Decodable: Default + Sized + 'static {
    type State: GrammarState;

    fn grammar() -> &'static Grammar<Self, Self::State>;
}

/// Semantic work executed on a transition
///
/// An action is specialized for exactly one field: it validates the TLV,
/// decodes its value, and stores the result into the object being built.
/// Actions only touch the object.
pub trait GrammarAction<T>: Send + Sync {
    /// Field description, used in logs and error context
    fn description(&self) -> &'static str;

    fn apply(&self, ctx: &ActionContext<'_>, object: &mut T) -> Result<(), DecodeError>;
}

/// What an action sees of the container
pub struct ActionContext<'a> {
    tlv: &'a Tlv,
    config: &'a DecoderConfig,
    depth: usize,
}

impl<'a> ActionContext<'a> {
    pub(crate) fn new(tlv: &'a Tlv, config: &'a DecoderConfig, depth: usize) -> Self {
        ActionContext { tlv, config, depth }
    }

    pub fn tlv(&self) -> &'a Tlv {
        self.tlv
    }

    /// The materialized value, possibly empty
    pub fn value(&self) -> Result<&'a [u8], DecodeError> {
        self.tlv
            .value()
            .ok_or_else(|| DecodeError::new(DecodeErrorKind::MissingValueBytes))
    }

    /// The materialized value, which must not be empty
    pub fn required_value(&self) -> Result<&'a [u8], DecodeError> {
        if self.tlv.length() == 0 {
            return Err(DecodeError::new(DecodeErrorKind::EmptyValueNotAllowed));
        }
        self.value()
    }

    /// Decode the value as a complete encoding of `U`
    ///
    /// This is how explicitly tagged fields (`[n] PrincipalName`) are decoded.
    pub fn decode_value<U: Decodable>(&self) -> Result<U, DecodeError> {
        let value = self.required_value()?;
        decode_embedded(
            U::grammar(),
            self.config,
            value,
            self.depth + 1,
            self.tlv.offset() + self.tlv.header_len(),
        )
    }

    /// Decode the whole TLV, header included, as an encoding of `U`
    ///
    /// This is how the elements of a SEQUENCE OF are decoded.
    pub fn decode_element<U: Decodable>(&self) -> Result<U, DecodeError> {
        let encoded = self
            .tlv
            .encoded()
            .ok_or_else(|| DecodeError::new(DecodeErrorKind::MissingValueBytes))?;
        decode_embedded(U::grammar(), self.config, encoded, self.depth, self.tlv.offset())
    }
}

/// How the container handles the TLV of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind<S> {
    /// Descend into a constructed TLV. A nesting frame is pushed; when its
    /// budget is exhausted the frame is popped and `close` becomes current.
    Enter { close: S },
    /// Materialize the whole value, then run the action
    Read,
}

pub struct Transition<T, S> {
    from: S,
    tag: Tag,
    to: S,
    kind: TransitionKind<S>,
    action: Option<Box<dyn GrammarAction<T>>>,
}

impl<T, S: GrammarState> Transition<T, S> {
    pub fn from_state(&self) -> S {
        self.from
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn to_state(&self) -> S {
        self.to
    }

    pub fn kind(&self) -> TransitionKind<S> {
        self.kind
    }

    pub fn action(&self) -> Option<&dyn GrammarAction<T>> {
        self.action.as_deref()
    }

    pub fn description(&self) -> &'static str {
        match self.action {
            Some(ref a) => a.description(),
            None => "",
        }
    }
}

impl<T, S: GrammarState> fmt::Debug for Transition<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("tag", &self.tag)
            .field("to", &self.to)
            .field("kind", &self.kind)
            .field("action", &self.description())
            .finish()
    }
}

/// Transition table of one message type
pub struct Grammar<T, S> {
    name: &'static str,
    initial: S,
    transitions: Vec<Transition<T, S>>,
    // (from, tag) -> position in `transitions`
    index: HashMap<(S, Tag), usize>,
    end_allowed: Vec<S>,
}

impl<T: 'static, S: GrammarState> Grammar<T, S> {
    pub fn builder(name: &'static str, initial: S) -> GrammarBuilder<T, S> {
        GrammarBuilder {
            grammar: Grammar {
                name,
                initial,
                transitions: Vec::new(),
                index: HashMap::new(),
                end_allowed: Vec::new(),
            },
        }
    }
}

impl<T, S: GrammarState> Grammar<T, S> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// State expecting the outermost tag
    pub fn initial_state(&self) -> S {
        self.initial
    }

    pub fn transition(&self, state: S, tag: Tag) -> Option<&Transition<T, S>> {
        self.index.get(&(state, tag)).map(|&i| &self.transitions[i])
    }

    /// Tags accepted in `state`
    pub fn expected_tags(&self, state: S) -> impl Iterator<Item = Tag> + '_ {
        self.transitions
            .iter()
            .filter(move |t| t.from == state)
            .map(|t| t.tag)
    }

    /// Whether the innermost open structure (or the message, when none is
    /// open) may end in `state`
    pub fn is_end_allowed(&self, state: S) -> bool {
        self.end_allowed.contains(&state)
    }
}

impl<T, S: GrammarState> fmt::Debug for Grammar<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("name", &self.name)
            .field("initial", &self.initial)
            .field("transitions", &self.transitions)
            .field("end_allowed", &self.end_allowed)
            .finish()
    }
}

pub struct GrammarBuilder<T, S> {
    grammar: Grammar<T, S>,
}

impl<T: 'static, S: GrammarState> GrammarBuilder<T, S> {
    fn push(mut self, from: S, tag: Tag, to: S, kind: TransitionKind<S>, action: Option<Box<dyn GrammarAction<T>>>) -> Self {
        let i = self.grammar.transitions.len();
        let previous = self.grammar.index.insert((from, tag), i);
        assert!(
            previous.is_none(),
            "{}: duplicate transition from {:?} on {:?}",
            self.grammar.name,
            from,
            tag
        );
        self.grammar.transitions.push(Transition {
            from,
            tag,
            to,
            kind,
            action,
        });
        self
    }

    /// Descend into a constructed TLV
    pub fn enter(self, from: S, tag: Tag, to: S, close: S) -> Self {
        self.push(from, tag, to, TransitionKind::Enter { close }, None)
    }

    /// Descend into a constructed TLV, running `action` first
    pub fn enter_with<A: GrammarAction<T> + 'static>(self, from: S, tag: Tag, to: S, close: S, action: A) -> Self {
        self.push(from, tag, to, TransitionKind::Enter { close }, Some(Box::new(action)))
    }

    /// Read a whole TLV and hand it to `action`
    pub fn read<A: GrammarAction<T> + 'static>(self, from: S, tag: Tag, to: S, action: A) -> Self {
        self.push(from, tag, to, TransitionKind::Read, Some(Box::new(action)))
    }

    pub fn end_allowed(mut self, states: &[S]) -> Self {
        self.grammar.end_allowed.extend_from_slice(states);
        self
    }

    pub fn build(self) -> Grammar<T, S> {
        self.grammar
    }
}
