//! Style model
//!
//! Fixed tables map TTML presentation attributes onto WebVTT output: text
//! decoration becomes `<b>`/`<i>`/`<u>` tags, text and display alignment
//! become cue settings, and three named regions act as complete presets.
//! A node's style starts from its parent's and is carried by value.

use bitflags::bitflags;

use crate::xml::{Document, NodeId};

bitflags! {
    /// Text decoration bits. Inherited by OR, never cleared by a descendant.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Decoration: u8 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 2;
    }
}

/// One decoration: the attribute/value that enables it and the tags it renders to
#[derive(Debug)]
pub struct DecorationEntry {
    pub flag: Decoration,
    pub attr: &'static str,
    pub value: &'static str,
    pub open_tag: &'static str,
    pub close_tag: &'static str,
}

/// Tags open in this order and close in reverse, so bold wraps italic wraps underline.
pub static DECORATIONS: [DecorationEntry; 3] = [
    DecorationEntry {
        flag: Decoration::BOLD,
        attr: "fontWeight",
        value: "bold",
        open_tag: "<b>",
        close_tag: "</b>",
    },
    DecorationEntry {
        flag: Decoration::ITALIC,
        attr: "fontStyle",
        value: "italic",
        open_tag: "<i>",
        close_tag: "</i>",
    },
    DecorationEntry {
        flag: Decoration::UNDERLINE,
        attr: "textDecoration",
        value: "underline",
        open_tag: "<u>",
        close_tag: "</u>",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Default,
    Start,
    Center,
    End,
    Left,
    Right,
}

impl TextAlign {
    /// WebVTT cue settings for this alignment
    pub fn annotation(self) -> &'static str {
        match self {
            TextAlign::Default => " ",
            TextAlign::Start => " position:15% align:start ",
            TextAlign::Center => " position:50% align:middle",
            TextAlign::End => " size:100% position:85% align:end",
            TextAlign::Left => " position:15% align:start",
            TextAlign::Right => " size:100% position:85% align:end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayAlign {
    #[default]
    Default,
    Before,
    Center,
    After,
}

impl DisplayAlign {
    pub fn annotation(self) -> &'static str {
        match self {
            DisplayAlign::Default => " ",
            DisplayAlign::Before => " line:10%",
            DisplayAlign::Center => " line:50%",
            DisplayAlign::After => " line:100%",
        }
    }
}

const ATTR_TEXT_ALIGN: &str = "textAlign";
const ATTR_DISPLAY_ALIGN: &str = "displayAlign";
const ATTR_REGION: &str = "region";

static TEXT_ALIGNS: [(&str, TextAlign); 5] = [
    ("start", TextAlign::Start),
    ("center", TextAlign::Center),
    ("end", TextAlign::End),
    ("left", TextAlign::Left),
    ("right", TextAlign::Right),
];

static DISPLAY_ALIGNS: [(&str, DisplayAlign); 3] = [
    ("before", DisplayAlign::Before),
    ("center", DisplayAlign::Center),
    ("after", DisplayAlign::After),
];

/// Effective style of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub decoration: Decoration,
    pub text_align: TextAlign,
    pub display_align: DisplayAlign,
}

impl Style {
    /// Cue settings line: text alignment then display alignment, defaults omitted
    pub fn annotation(&self) -> impl Iterator<Item = &'static str> {
        let text = (self.text_align != TextAlign::Default).then(|| self.text_align.annotation());
        let display =
            (self.display_align != DisplayAlign::Default).then(|| self.display_align.annotation());
        text.into_iter().chain(display)
    }
}

/// A named style bundle a node adopts through its `region` attribute
#[derive(Debug)]
pub struct RegionPreset {
    pub id: &'static str,
    pub style: Style,
}

// Every region inherits the bold "defaultSpeaker" style and centers its text;
// they differ only in vertical placement.
pub static REGIONS: [RegionPreset; 3] = [
    RegionPreset {
        id: "lowerThird",
        style: Style {
            decoration: Decoration::BOLD,
            text_align: TextAlign::Center,
            display_align: DisplayAlign::After,
        },
    },
    RegionPreset {
        id: "middleThird",
        style: Style {
            decoration: Decoration::BOLD,
            text_align: TextAlign::Center,
            display_align: DisplayAlign::Center,
        },
    },
    RegionPreset {
        id: "upperThird",
        style: Style {
            decoration: Decoration::BOLD,
            text_align: TextAlign::Center,
            display_align: DisplayAlign::Before,
        },
    },
];

const STYLE_CONTAINERS: [&str; 5] = ["p", "div", "region", "span", "body"];

/// True if the element may carry style attributes
pub fn can_contain_style(doc: &Document, node: NodeId) -> bool {
    doc.element_name(node)
        .is_some_and(|name| STYLE_CONTAINERS.contains(&name))
}

/// Decoration bits set by the node's own attributes
pub fn node_decoration(doc: &Document, node: NodeId) -> Decoration {
    DECORATIONS
        .iter()
        .filter(|d| doc.has_attribute_value(node, d.attr, d.value))
        .fold(Decoration::empty(), |acc, d| acc | d.flag)
}

/// Compute the style of `node` on top of the style it inherits.
///
/// A known region replaces the whole inherited style first. Each alignment
/// category then takes the first table entry whose value matches, and
/// decoration bits are OR-ed in.
pub fn compute_style(doc: &Document, node: NodeId, inherited: Style) -> Style {
    let mut style = inherited;

    if let Some(region) = REGIONS
        .iter()
        .find(|r| doc.has_attribute_value(node, ATTR_REGION, r.id))
    {
        style = region.style;
    }

    if let Some((_, align)) = TEXT_ALIGNS
        .iter()
        .find(|(value, _)| doc.has_attribute_value(node, ATTR_TEXT_ALIGN, value))
    {
        style.text_align = *align;
    }

    if let Some((_, align)) = DISPLAY_ALIGNS
        .iter()
        .find(|(value, _)| doc.has_attribute_value(node, ATTR_DISPLAY_ALIGN, value))
    {
        style.display_align = *align;
    }

    style.decoration |= node_decoration(doc, node);
    style
}
