mod file;
mod player_state;
mod track_progress;

pub use file::AudioFile;
pub use player_state::PlayerState;
pub use track_progress::TrackProgress;
