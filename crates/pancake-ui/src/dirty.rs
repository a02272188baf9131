//! Dirty flag tracking for widgets awaiting re-render.

use bitflags::bitflags;

bitflags! {
    /// Reasons a widget's fragment has to be rendered again.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE      = 0b0000_0000;

        /// The widget's value changed.
        const VALUE     = 0b0000_0001;

        /// Children were added or removed.
        const CHILDREN  = 0b0000_0010;

        /// Static presentation changed (title, display function, style).
        const STYLE     = 0b0000_0100;
    }
}

impl DirtyFlags {
    /// Returns true if the fragment must be re-rendered.
    #[inline]
    pub fn needs_render(&self) -> bool {
        !self.is_empty()
    }

    /// Returns true if the set of children changed.
    #[inline]
    pub fn is_structural(&self) -> bool {
        self.contains(Self::CHILDREN)
    }

    /// Returns true if a parent that inlines this widget's markup must be
    /// re-rendered too.
    ///
    /// Structural changes stay local: the widget's own fragment already
    /// contains its new children.
    #[inline]
    pub fn should_propagate_to_parent(&self) -> bool {
        self.intersects(Self::VALUE | Self::STYLE)
    }

    /// Get flags that should be propagated to parent nodes.
    #[inline]
    pub fn propagation_flags(&self) -> Self {
        if self.should_propagate_to_parent() {
            Self::VALUE
        } else {
            Self::NONE
        }
    }
}

impl Default for DirtyFlags {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_render() {
        assert!(!DirtyFlags::NONE.needs_render());
        assert!(DirtyFlags::VALUE.needs_render());
        assert!(DirtyFlags::CHILDREN.needs_render());
        assert!(DirtyFlags::STYLE.needs_render());
    }

    #[test]
    fn test_propagation() {
        assert!(DirtyFlags::VALUE.should_propagate_to_parent());
        assert!(DirtyFlags::STYLE.should_propagate_to_parent());
        assert!(!DirtyFlags::CHILDREN.should_propagate_to_parent());
        assert!(!DirtyFlags::NONE.should_propagate_to_parent());
    }

    #[test]
    fn test_propagation_flags() {
        assert_eq!(DirtyFlags::STYLE.propagation_flags(), DirtyFlags::VALUE);
        assert_eq!(
            (DirtyFlags::VALUE | DirtyFlags::CHILDREN).propagation_flags(),
            DirtyFlags::VALUE
        );
        assert_eq!(DirtyFlags::CHILDREN.propagation_flags(), DirtyFlags::NONE);
    }

    #[test]
    fn test_structural() {
        assert!(DirtyFlags::CHILDREN.is_structural());
        assert!(!(DirtyFlags::VALUE | DirtyFlags::STYLE).is_structural());
    }
}
