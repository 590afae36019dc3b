//! Content block registry.
//!
//! Maps a block's type tag to the macro that renders it. The set of block
//! kinds is closed: adding one means adding a variant here and a macro in
//! `components/blocks.html`.

/// Template file holding one macro per block kind.
pub const BLOCKS_TEMPLATE: &str = "components/blocks.html";

/// Namespace the synthesized page imports `BLOCKS_TEMPLATE` under.
pub const BLOCKS_NAMESPACE: &str = "blocks";

/// Macro rendering the notice for an unrecognized type tag.
pub const UNSUPPORTED_MACRO: &str = "unsupported";

/// Known content block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    AccordionCard,
    AccordionFormGroup,
    AccordionFormLabel,
}

impl BlockKind {
    pub const ALL: [BlockKind; 3] = [
        BlockKind::AccordionCard,
        BlockKind::AccordionFormGroup,
        BlockKind::AccordionFormLabel,
    ];

    /// Exact, case-sensitive match on the type tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "AccordionCard" => Some(BlockKind::AccordionCard),
            "AccordionFormGroup" => Some(BlockKind::AccordionFormGroup),
            "AccordionFormLabel" => Some(BlockKind::AccordionFormLabel),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            BlockKind::AccordionCard => "AccordionCard",
            BlockKind::AccordionFormGroup => "AccordionFormGroup",
            BlockKind::AccordionFormLabel => "AccordionFormLabel",
        }
    }

    /// Macro name in `BLOCKS_TEMPLATE`.
    pub fn fragment(self) -> &'static str {
        match self {
            BlockKind::AccordionCard => "accordion_card",
            BlockKind::AccordionFormGroup => "accordion_form_group",
            BlockKind::AccordionFormLabel => "accordion_form_label",
        }
    }
}

/// Fragment for a type tag; unknown tags get the unsupported notice.
pub fn fragment_for(tag: &str) -> &'static str {
    BlockKind::from_tag(tag).map_or(UNSUPPORTED_MACRO, BlockKind::fragment)
}
