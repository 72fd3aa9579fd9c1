pub mod attack;
pub mod battle;
pub mod body;
pub mod clock;
pub mod collision;
pub mod components;
pub mod events;
pub mod fighter;
pub mod input;
pub mod menu;
pub mod outcome;
pub mod stage;
