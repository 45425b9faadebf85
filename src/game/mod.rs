// Game logic: the playable character and the level it runs in

pub mod characters;
pub mod level;
