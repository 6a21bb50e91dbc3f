use bevy::prelude::*;

/// What the grab/interaction host exposes for one object: how many grip
/// contacts are currently selecting it, and whether it accepts new grabs.
///
/// The host writes the contact count; the lifecycle only cares whether it is
/// zero or not.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Grabbable {
    pub enabled: bool,
    pub(crate) selecting_points: u32,
}

impl Grabbable {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            selecting_points: 0,
        }
    }

    pub fn selecting_points(&self) -> u32 {
        self.selecting_points
    }

    pub fn is_held(&self) -> bool {
        self.selecting_points > 0
    }

    /// Adds a grip contact. Refused while grabbing is disabled.
    pub fn try_grab(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        self.selecting_points += 1;
        true
    }

    /// Removes one grip contact.
    pub fn release(&mut self) {
        self.selecting_points = self.selecting_points.saturating_sub(1);
    }

    /// Drops every grip contact at once.
    pub fn release_all(&mut self) {
        self.selecting_points = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_grabbable_refuses_grabs() {
        let mut grabbable = Grabbable::disabled();
        assert!(!grabbable.try_grab());
        assert!(!grabbable.is_held());

        grabbable.enabled = true;
        assert!(grabbable.try_grab());
        assert!(grabbable.is_held());
    }

    #[test]
    fn test_contacts_are_counted() {
        let mut grabbable = Grabbable { enabled: true, ..default() };
        grabbable.try_grab();
        grabbable.try_grab();
        assert_eq!(grabbable.selecting_points(), 2);

        grabbable.release();
        assert!(grabbable.is_held());
        grabbable.release();
        grabbable.release();
        assert_eq!(grabbable.selecting_points(), 0);
    }
}
