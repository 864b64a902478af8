//! Selector parsing and matching through Servo's `selectors` crate.
//!
//! No pseudo-classes or pseudo-elements are defined beyond the tree-structural
//! ones `selectors` handles itself, so `:hover` and friends fail to parse, and
//! a selector that fails to parse matches nothing.

use cssparser::{CssStringWriter, Parser as CssParser, ParserInput, ToCss, serialize_identifier};
use precomputed_hash::PrecomputedHash;
use selectors::NthIndexCache;
use selectors::context::QuirksMode;
use selectors::matching::{
    IgnoreNthChildForInvalidation, MatchingContext, MatchingMode, NeedsSelectorFlags,
    matches_selector_list,
};
use selectors::parser::{
    ParseRelative, Parser as SelParser, SelectorImpl, SelectorList as ServoSelectorList,
    SelectorParseErrorKind,
};

/// Identifier, local name and namespace atom.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct CssIdent(pub String);

impl AsRef<str> for CssIdent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for CssIdent {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<'a> From<&'a str> for CssIdent {
    fn from(s: &'a str) -> Self {
        Self(s.to_owned())
    }
}

impl ToCss for CssIdent {
    fn to_css<W>(&self, dest: &mut W) -> std::fmt::Result
    where
        W: std::fmt::Write,
    {
        serialize_identifier(&self.0, dest)
    }
}

impl PrecomputedHash for CssIdent {
    // FNV-1a; only used for bloom filtering, which we never enable.
    fn precomputed_hash(&self) -> u32 {
        self.0.bytes().fold(0x811c_9dc5_u32, |hash, byte| {
            (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193)
        })
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct CssAttrValue(pub String);

impl AsRef<str> for CssAttrValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'a> From<&'a str> for CssAttrValue {
    fn from(s: &'a str) -> Self {
        Self(s.to_owned())
    }
}

impl ToCss for CssAttrValue {
    fn to_css<W>(&self, dest: &mut W) -> std::fmt::Result
    where
        W: std::fmt::Write,
    {
        use std::fmt::Write;
        write!(CssStringWriter::new(dest), "{}", &self.0)
    }
}

/// Selector flavour with no custom pseudos.
#[derive(Clone, Debug)]
pub enum ShellSelectors {}

impl SelectorImpl for ShellSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = CssAttrValue;
    type Identifier = CssIdent;
    type LocalName = CssIdent;
    type NamespaceUrl = CssIdent;
    type NamespacePrefix = CssIdent;
    type BorrowedNamespaceUrl = str;
    type BorrowedLocalName = str;
    type NonTSPseudoClass = Never;
    type PseudoElement = Never;
}

/// Uninhabited pseudo-class and pseudo-element type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Never {}

impl ToCss for Never {
    fn to_css<W>(&self, _dest: &mut W) -> std::fmt::Result
    where
        W: std::fmt::Write,
    {
        Ok(())
    }
}

impl selectors::parser::NonTSPseudoClass for Never {
    type Impl = ShellSelectors;

    fn is_active_or_hover(&self) -> bool {
        false
    }

    fn is_user_action_state(&self) -> bool {
        false
    }
}

impl selectors::parser::PseudoElement for Never {
    type Impl = ShellSelectors;

    fn accepts_state_pseudo_classes(&self) -> bool {
        false
    }

    fn valid_after_slotted(&self) -> bool {
        false
    }
}

#[derive(Default)]
struct ShellParser;

impl<'i> SelParser<'i> for ShellParser {
    type Impl = ShellSelectors;
    type Error = SelectorParseErrorKind<'i>;
}

/// A parsed, comma separated selector list.
#[derive(Clone, Debug)]
pub struct SelectorList(ServoSelectorList<ShellSelectors>);

impl SelectorList {
    /// Parse `input`; `None` when it is empty or invalid.
    pub fn parse(input: &str) -> Option<Self> {
        let mut input = ParserInput::new(input);
        let mut parser = CssParser::new(&mut input);
        let list =
            ServoSelectorList::parse(&ShellParser, &mut parser, ParseRelative::No).ok()?;
        Some(Self(list))
    }

    pub fn matches<E>(&self, element: &E) -> bool
    where
        E: selectors::Element<Impl = ShellSelectors>,
    {
        let mut cache = NthIndexCache::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut cache,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            IgnoreNthChildForInvalidation::No,
        );
        matches_selector_list(&self.0, element, &mut context)
    }
}
