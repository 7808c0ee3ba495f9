pub mod backup;
pub mod contract;
pub mod events;
pub mod media;
pub mod settings;
pub mod status;
pub mod strict;
