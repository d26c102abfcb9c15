mod demo;
mod npc;
mod player;
mod world;

pub(crate) use demo::DemoScript;
pub(crate) use world::GameWorld;
