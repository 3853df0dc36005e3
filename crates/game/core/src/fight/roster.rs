use std::collections::HashMap;

use crate::creature::Creature;

/// Lookup of the live creatures taking part in a fight.
pub trait Roster {
    fn creature(&self, id: &str) -> Option<&Creature>;

    fn creature_mut(&mut self, id: &str) -> Option<&mut Creature>;

    fn able_to_fight(&self, id: &str) -> bool {
        self.creature(id).is_some_and(Creature::able_to_fight)
    }
}

impl Roster for HashMap<String, Creature> {
    fn creature(&self, id: &str) -> Option<&Creature> {
        self.get(id)
    }

    fn creature_mut(&mut self, id: &str) -> Option<&mut Creature> {
        self.get_mut(id)
    }
}
