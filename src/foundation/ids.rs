use crate::foundation::id_name_map::Identifier;

/// Declares the built-in ids of one identifier space.
///
/// Produces associated constants on the id type, a `(name, id)` table used to seed the
/// [`IdNameMap`](crate::foundation::id_name_map::IdNameMap), and the `NUM_DEFINED_*` bound.
/// Ordinals are dense and start at 1; 0 is always `INVALID`.
macro_rules! define_ids {
    (
        $id:ident, $ordinal:ident, $table:ident, $num_defined:ident;
        $($konst:ident => $name:literal,)*
    ) => {
        #[allow(dead_code, non_camel_case_types, clippy::upper_case_acronyms)]
        #[repr(u32)]
        enum $ordinal {
            Invalid,
            $($konst,)*
            NumDefined,
        }

        impl $id {
            pub const INVALID: $id = $id(0);
            $(pub const $konst: $id = $id($ordinal::$konst as u32);)*
        }

        /// Number of statically known ids, including `INVALID`.
        pub const $num_defined: u32 = $ordinal::NumDefined as u32;

        pub(crate) const $table: &[(&str, $id)] = &[$(($name, $id::$konst),)*];
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PropertyId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ShorthandId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EventId(pub u32);

macro_rules! impl_identifier {
    ($($id:ident),*) => {
        $(
            impl Identifier for $id {
                const INVALID: Self = $id(0);

                fn from_index(index: u32) -> Self {
                    $id(index)
                }

                fn index(self) -> u32 {
                    self.0
                }
            }
        )*
    };
}

impl_identifier!(PropertyId, ShorthandId, EventId);

define_ids! {
    PropertyId, PropertyOrdinal, BUILTIN_PROPERTIES, NUM_DEFINED_PROPERTY_IDS;
    MARGIN_TOP => "margin-top",
    MARGIN_RIGHT => "margin-right",
    MARGIN_BOTTOM => "margin-bottom",
    MARGIN_LEFT => "margin-left",
    PADDING_TOP => "padding-top",
    PADDING_RIGHT => "padding-right",
    PADDING_BOTTOM => "padding-bottom",
    PADDING_LEFT => "padding-left",
    BORDER_TOP_WIDTH => "border-top-width",
    BORDER_RIGHT_WIDTH => "border-right-width",
    BORDER_BOTTOM_WIDTH => "border-bottom-width",
    BORDER_LEFT_WIDTH => "border-left-width",
    BORDER_TOP_COLOR => "border-top-color",
    BORDER_RIGHT_COLOR => "border-right-color",
    BORDER_BOTTOM_COLOR => "border-bottom-color",
    BORDER_LEFT_COLOR => "border-left-color",
    BORDER_TOP_LEFT_RADIUS => "border-top-left-radius",
    BORDER_TOP_RIGHT_RADIUS => "border-top-right-radius",
    BORDER_BOTTOM_RIGHT_RADIUS => "border-bottom-right-radius",
    BORDER_BOTTOM_LEFT_RADIUS => "border-bottom-left-radius",
    DISPLAY => "display",
    POSITION => "position",
    TOP => "top",
    RIGHT => "right",
    BOTTOM => "bottom",
    LEFT => "left",
    FLOAT => "float",
    CLEAR => "clear",
    BOX_SIZING => "box-sizing",
    Z_INDEX => "z-index",
    WIDTH => "width",
    MIN_WIDTH => "min-width",
    MAX_WIDTH => "max-width",
    HEIGHT => "height",
    MIN_HEIGHT => "min-height",
    MAX_HEIGHT => "max-height",
    LINE_HEIGHT => "line-height",
    VERTICAL_ALIGN => "vertical-align",
    OVERFLOW_X => "overflow-x",
    OVERFLOW_Y => "overflow-y",
    CLIP => "clip",
    VISIBILITY => "visibility",
    BACKGROUND_COLOR => "background-color",
    COLOR => "color",
    CARET_COLOR => "caret-color",
    IMAGE_COLOR => "image-color",
    OPACITY => "opacity",
    FONT_FAMILY => "font-family",
    FONT_STYLE => "font-style",
    FONT_WEIGHT => "font-weight",
    FONT_SIZE => "font-size",
    LETTER_SPACING => "letter-spacing",
    TEXT_ALIGN => "text-align",
    TEXT_DECORATION => "text-decoration",
    TEXT_TRANSFORM => "text-transform",
    WHITE_SPACE => "white-space",
    WORD_BREAK => "word-break",
    ROW_GAP => "row-gap",
    COLUMN_GAP => "column-gap",
    CURSOR => "cursor",
    POINTER_EVENTS => "pointer-events",
    FOCUS => "focus",
    TAB_INDEX => "tab-index",
    PERSPECTIVE => "perspective",
    DECORATOR => "decorator",
    MASK_IMAGE => "mask-image",
    FILTER => "filter",
    BACKDROP_FILTER => "backdrop-filter",
    BOX_SHADOW => "box-shadow",
    FLEX_DIRECTION => "flex-direction",
    FLEX_WRAP => "flex-wrap",
    FLEX_GROW => "flex-grow",
    FLEX_SHRINK => "flex-shrink",
    FLEX_BASIS => "flex-basis",
    ALIGN_ITEMS => "align-items",
    JUSTIFY_CONTENT => "justify-content",
}

define_ids! {
    ShorthandId, ShorthandOrdinal, BUILTIN_SHORTHANDS, NUM_DEFINED_SHORTHAND_IDS;
    MARGIN => "margin",
    PADDING => "padding",
    BORDER_WIDTH => "border-width",
    BORDER_COLOR => "border-color",
    BORDER_TOP => "border-top",
    BORDER_RIGHT => "border-right",
    BORDER_BOTTOM => "border-bottom",
    BORDER_LEFT => "border-left",
    BORDER => "border",
    BORDER_RADIUS => "border-radius",
    OVERFLOW => "overflow",
    BACKGROUND => "background",
    FONT => "font",
    GAP => "gap",
    FLEX => "flex",
    FLEX_FLOW => "flex-flow",
}

define_ids! {
    EventId, EventOrdinal, BUILTIN_EVENTS, NUM_DEFINED_EVENT_IDS;
    MOUSEDOWN => "mousedown",
    MOUSESCROLL => "mousescroll",
    MOUSEOVER => "mouseover",
    MOUSEOUT => "mouseout",
    FOCUS => "focus",
    BLUR => "blur",
    KEYDOWN => "keydown",
    KEYUP => "keyup",
    TEXTINPUT => "textinput",
    MOUSEUP => "mouseup",
    CLICK => "click",
    DBLCLICK => "dblclick",
    LOAD => "load",
    UNLOAD => "unload",
    SHOW => "show",
    HIDE => "hide",
    MOUSEMOVE => "mousemove",
    DRAGMOVE => "dragmove",
    DRAG => "drag",
    DRAGSTART => "dragstart",
    DRAGOVER => "dragover",
    DRAGDROP => "dragdrop",
    DRAGOUT => "dragout",
    DRAGEND => "dragend",
    HANDLEDRAG => "handledrag",
    RESIZE => "resize",
    SCROLL => "scroll",
    ANIMATIONEND => "animationend",
    TRANSITIONEND => "transitionend",
    CHANGE => "change",
    SUBMIT => "submit",
    TABCHANGE => "tabchange",
}

/// First id handed out to runtime-registered property names.
pub const FIRST_CUSTOM_PROPERTY_ID: u32 = NUM_DEFINED_PROPERTY_IDS;
pub const FIRST_CUSTOM_SHORTHAND_ID: u32 = NUM_DEFINED_SHORTHAND_IDS;
pub const FIRST_CUSTOM_EVENT_ID: u32 = NUM_DEFINED_EVENT_IDS;

impl PropertyId {
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    /// Built-in ids are backed by the fixed bitset of a [`PropertyIdSet`](crate::style::dirty::PropertyIdSet).
    pub fn is_builtin(self) -> bool {
        self.0 < NUM_DEFINED_PROPERTY_IDS
    }
}

impl ShorthandId {
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl EventId {
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    pub fn is_builtin(self) -> bool {
        self.0 < NUM_DEFINED_EVENT_IDS
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/ids.rs"]
mod tests;
