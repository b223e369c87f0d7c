/// Identity of a cached canvas layer.
///
/// Bare variants are single-instance layers; the menu sector icons are
/// parameterized by index and visual state, one entry each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKey {
    Background,
    Terrain,
    Items,
    Path,
    Menu,
    MenuSector { index: usize, active: bool },
}

impl LayerKey {
    /// Layers whose pixels are anchored to the pan and scale in effect at
    /// render time.
    pub const VIEWPORT_DEPENDENT: [LayerKey; 2] = [LayerKey::Terrain, LayerKey::Items];

    pub fn name(&self) -> &'static str {
        match self {
            LayerKey::Background => "background",
            LayerKey::Terrain => "terrain",
            LayerKey::Items => "items",
            LayerKey::Path => "path",
            LayerKey::Menu => "menu",
            LayerKey::MenuSector { active: false, .. } => "menu_sector_inactive",
            LayerKey::MenuSector { active: true, .. } => "menu_sector_active",
        }
    }
}

impl std::fmt::Display for LayerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerKey::MenuSector { index, .. } => write!(f, "{}({})", self.name(), index),
            _ => f.write_str(self.name()),
        }
    }
}
