use super::{Theme, ThemeField};

/// The single active theme for a session.
///
/// A custom theme, once created, wins over the catalog selection until it is
/// discarded. Selecting a catalog entry underneath it does not replace it.
#[derive(Clone, Debug)]
pub struct ThemeContext
{
    selected: &'static Theme,
    custom: Option<Theme>,
}

impl ThemeContext
{
    pub fn new(selected: &'static Theme) -> Self
    {
        Self {
            selected,
            custom: None,
        }
    }

    pub fn current(&self) -> &Theme
    {
        self.custom.as_ref().unwrap_or(self.selected)
    }

    pub fn selected(&self) -> &'static Theme
    {
        self.selected
    }

    pub fn is_custom(&self) -> bool
    {
        self.custom.is_some()
    }

    /// Switches the catalog entry. A custom theme stays in force.
    pub fn select(&mut self, name: &str) -> bool
    {
        match super::find(name) {
            Some(theme) => {
                self.selected = theme;
                true
            }
            None => false,
        }
    }

    /// Drops the custom copy so the catalog selection shows again.
    pub fn discard_custom(&mut self) -> bool
    {
        self.custom.take().is_some()
    }

    /// Snapshots the current theme into a fresh custom copy.
    pub fn customize(&mut self)
    {
        let mut copy = self.current().clone();
        if !copy.name.starts_with("Custom") {
            copy.name = format!("Custom ({})", copy.name);
        }
        self.custom = Some(copy);
    }

    /// Edits the custom copy in place. Without a custom copy nothing changes.
    pub fn edit(&mut self, field: ThemeField, value: &str) -> bool
    {
        match self.custom.as_mut() {
            Some(theme) => field.set(theme, value),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::theme::{find, Rgb};

    fn context(name: &str) -> ThemeContext
    {
        ThemeContext::new(find(name).expect("catalog theme"))
    }

    #[test]
    fn custom_overrides_catalog_selection()
    {
        let mut ctx = context("Dark");
        ctx.customize();
        assert!(ctx.edit(ThemeField::Background, "#010203"));
        assert_eq!(ctx.current().background, Rgb::new(1, 2, 3));
        assert_eq!(ctx.selected().name, "Dark");
        assert_eq!(ctx.current().primary, ctx.selected().primary);
    }

    #[test]
    fn custom_stays_in_force_across_catalog_selection()
    {
        let mut ctx = context("Dark");
        ctx.customize();
        ctx.edit(ThemeField::Text, "#000000");
        assert!(ctx.select("neon"));
        assert!(ctx.is_custom());
        assert_eq!(ctx.selected().name, "Neon");
        assert_eq!(ctx.current().name, "Custom (Dark)");
        assert_eq!(ctx.current().text, Rgb::new(0, 0, 0));

        assert!(ctx.discard_custom());
        assert_eq!(ctx.current().name, "Neon");
        assert!(!ctx.discard_custom());
        assert!(!ctx.select("missing"));
        assert_eq!(ctx.current().name, "Neon");
    }

    #[test]
    fn customize_again_snapshots_live_custom()
    {
        let mut ctx = context("Classic");
        ctx.customize();
        ctx.edit(ThemeField::Glyph, "@");
        ctx.customize();
        assert_eq!(ctx.current().glyph, "@");
        assert_eq!(ctx.current().name, "Custom (Classic)");
    }

    #[test]
    fn edit_without_custom_is_ignored()
    {
        let mut ctx = context("Classic");
        assert!(!ctx.edit(ThemeField::Primary, "#000000"));
        assert_eq!(ctx.current(), ctx.selected());
    }
}
