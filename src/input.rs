/// How a button-like control was triggered. Pointer and keyboard activation are equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Pointer,
    Key(ActivationKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationKey {
    Enter,
    Space,
    Other,
}

impl Activation {
    pub fn triggers(self) -> bool {
        match self {
            Self::Pointer => true,
            Self::Key(ActivationKey::Enter | ActivationKey::Space) => true,
            Self::Key(ActivationKey::Other) => false,
        }
    }
}

/// A group of buttons where exactly one is marked active.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleGroup<T> {
    options: Vec<T>,
    active: usize,
}

impl<T: Clone + PartialEq> ToggleGroup<T> {
    /// The first option starts active.
    pub fn new(options: Vec<T>) -> Self {
        Self { options, active: 0 }
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    pub fn active(&self) -> Option<&T> {
        self.options.get(self.active)
    }

    pub fn is_active(&self, option: &T) -> bool {
        self.active() == Some(option)
    }

    /// Marks `option` active when the activation triggers. Returns the newly active option.
    pub fn activate(&mut self, option: &T, activation: Activation) -> Option<&T> {
        if !activation.triggers() {
            return None;
        }
        self.mark(option)
    }

    /// Marks `option` active without user activation, e.g. when pushing state into the controls.
    pub fn mark(&mut self, option: &T) -> Option<&T> {
        let index = self.options.iter().position(|candidate| candidate == option)?;
        self.active = index;
        self.options.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_enter_and_space_trigger() {
        assert!(Activation::Pointer.triggers());
        assert!(Activation::Key(ActivationKey::Enter).triggers());
        assert!(Activation::Key(ActivationKey::Space).triggers());
        assert!(!Activation::Key(ActivationKey::Other).triggers());
    }

    #[test]
    fn exactly_one_option_is_active() {
        let mut group = ToggleGroup::new(vec!["left", "center", "right"]);
        assert_eq!(group.active(), Some(&"left"));

        group.activate(&"right", Activation::Pointer);
        assert!(group.is_active(&"right"));
        assert!(!group.is_active(&"left"));

        group.activate(&"center", Activation::Key(ActivationKey::Space));
        assert_eq!(
            group.options().iter().filter(|o| group.is_active(o)).count(),
            1
        );
        assert!(group.is_active(&"center"));
    }

    #[test]
    fn unknown_options_and_other_keys_leave_the_group_alone() {
        let mut group = ToggleGroup::new(vec!["left", "center"]);
        assert!(group.activate(&"justify", Activation::Pointer).is_none());
        assert!(group
            .activate(&"center", Activation::Key(ActivationKey::Other))
            .is_none());
        assert!(group.is_active(&"left"));
    }
}
