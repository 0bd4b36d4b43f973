//! Event kinds and the `name.namespace` selector syntax used by `bind`/`unbind`.

use std::{fmt, str::FromStr};

use super::error::InteractionError;

/// Every event a node can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Click,
    DblClick,
    MouseOver,
    MouseOut,
    MouseMove,
    TouchMove,
    MouseDown,
    TouchStart,
    MouseUp,
    TouchEnd,
    MouseUpOutside,
    TouchEndOutside,
    ContextMenu,
    RightUp,
    RightClick,
    RightUpOutside,
    RightDown,
}

/// Alternative names accepted when parsing.
pub const EVENT_ALIASES: &[(&str, EventKind)] =
    &[("tap", EventKind::Click), ("dbltap", EventKind::DblClick)];

impl EventKind {
    pub const ALL: [EventKind; 17] = [
        EventKind::Click,
        EventKind::DblClick,
        EventKind::MouseOver,
        EventKind::MouseOut,
        EventKind::MouseMove,
        EventKind::TouchMove,
        EventKind::MouseDown,
        EventKind::TouchStart,
        EventKind::MouseUp,
        EventKind::TouchEnd,
        EventKind::MouseUpOutside,
        EventKind::TouchEndOutside,
        EventKind::ContextMenu,
        EventKind::RightUp,
        EventKind::RightClick,
        EventKind::RightUpOutside,
        EventKind::RightDown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::DblClick => "dblclick",
            EventKind::MouseOver => "mouseover",
            EventKind::MouseOut => "mouseout",
            EventKind::MouseMove => "mousemove",
            EventKind::TouchMove => "touchmove",
            EventKind::MouseDown => "mousedown",
            EventKind::TouchStart => "touchstart",
            EventKind::MouseUp => "mouseup",
            EventKind::TouchEnd => "touchend",
            EventKind::MouseUpOutside => "mouseupoutside",
            EventKind::TouchEndOutside => "touchendoutside",
            EventKind::ContextMenu => "contextmenu",
            EventKind::RightUp => "rightup",
            EventKind::RightClick => "rightclick",
            EventKind::RightUpOutside => "rightupoutside",
            EventKind::RightDown => "rightdown",
        }
    }

    /// Resolves a root event name, aliases included.
    pub fn from_name(name: &str) -> Option<EventKind> {
        EVENT_ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map(|(_, kind)| *kind)
            .or_else(|| Self::ALL.iter().copied().find(|kind| kind.as_str() == name))
    }

    /// Hover events need pointer-move sampling to be detected at all.
    pub fn is_hover(&self) -> bool {
        matches!(self, EventKind::MouseOver | EventKind::MouseOut)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = InteractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(InteractionError::EmptyEventName);
        }
        EventKind::from_name(s).ok_or_else(|| InteractionError::UnknownEvent(s.to_string()))
    }
}

/// One parsed entry of an event string such as `"click.menu"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSelector {
    pub kind: EventKind,
    pub namespace: Option<String>,
}

impl EventSelector {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Parses a whitespace separated list of `name[.namespace]` tokens.
    ///
    /// The whole list is validated before anything is returned, so callers can
    /// apply it atomically.
    pub fn parse_list(events: &str) -> Result<Vec<EventSelector>, InteractionError> {
        let selectors = events
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<EventSelector>, _>>()?;

        if selectors.is_empty() {
            return Err(InteractionError::EmptyEventName);
        }
        Ok(selectors)
    }
}

impl FromStr for EventSelector {
    type Err = InteractionError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (name, namespace) = match token.split_once('.') {
            Some((name, namespace)) => (name, Some(namespace)),
            None => (token, None),
        };

        Ok(Self {
            kind: name.parse()?,
            namespace: namespace.filter(|ns| !ns.is_empty()).map(str::to_string),
        })
    }
}

impl fmt::Display for EventSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{}.{}", self.kind, namespace),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_round_trips_through_its_name() {
        for kind in EventKind::ALL {
            assert_eq!(kind.as_str().parse::<EventKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_aliases_resolve() {
        assert_eq!(EventKind::from_name("tap"), Some(EventKind::Click));
        assert_eq!(EventKind::from_name("dbltap"), Some(EventKind::DblClick));
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        assert_eq!(
            "hover".parse::<EventKind>(),
            Err(InteractionError::UnknownEvent("hover".to_string()))
        );
    }

    #[test]
    fn test_parse_list_with_namespaces() {
        let selectors = EventSelector::parse_list("click.menu  mouseover tap.ui").unwrap();
        assert_eq!(
            selectors,
            vec![
                EventSelector::new(EventKind::Click).with_namespace("menu"),
                EventSelector::new(EventKind::MouseOver),
                EventSelector::new(EventKind::Click).with_namespace("ui"),
            ]
        );
    }

    #[test]
    fn test_parse_list_fails_as_a_whole() {
        assert_eq!(
            EventSelector::parse_list("click bogus.ns"),
            Err(InteractionError::UnknownEvent("bogus".to_string()))
        );
        assert_eq!(
            EventSelector::parse_list("   "),
            Err(InteractionError::EmptyEventName)
        );
    }

    #[test]
    fn test_namespace_only_token_is_invalid() {
        assert_eq!(
            ".menu".parse::<EventSelector>(),
            Err(InteractionError::EmptyEventName)
        );
    }
}
