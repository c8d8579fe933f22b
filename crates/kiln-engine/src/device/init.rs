/// Graphics context parameters.
///
/// Kept small on purpose; the harness only needs a core-profile context of a
/// known version.
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Requested OpenGL version as `(major, minor)`. Core profile.
    ///
    /// 3.3 is the lowest version with every entry point `GlApi` uses.
    pub gl_version: (u8, u8),

    /// Synchronize buffer swaps with the display refresh (swap interval 1).
    pub vsync: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            gl_version: (3, 3),
            vsync: true,
        }
    }
}
