use crate::nodes::ContainerKind;

pub type StyleDeclarations = &'static [(&'static str, &'static str)];

pub const COLUMN_STYLE: StyleDeclarations = &[
    ("display", "flex"),
    ("flex-direction", "column"),
    ("align-items", "stretch"),
    ("justify-content", "flex-start"),
];

pub const ROW_STYLE: StyleDeclarations = &[
    ("display", "flex"),
    ("flex-direction", "row"),
    ("align-items", "center"),
    ("justify-content", "center"),
];

pub const IMAGE_STYLE: StyleDeclarations = &[("max-width", "100%")];

pub const SEPARATOR_STYLE: StyleDeclarations = &[
    ("width", "100%"),
    ("border", "none"),
    ("border-top", "1px solid #e0e0e0"),
    ("margin", "8px 0"),
];

pub fn container_style(kind: ContainerKind) -> StyleDeclarations {
    match kind {
        ContainerKind::Column => COLUMN_STYLE,
        ContainerKind::Row => ROW_STYLE,
    }
}

pub fn gap_value(gap_px: u32) -> String {
    format!("{}px", gap_px)
}
