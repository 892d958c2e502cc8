mod de;
mod episode;
mod podcast;

pub use episode::{Episode, PlayingStatus};
pub use podcast::{Podcast, SortOrder};

pub(crate) use episode::{EpisodeEntry, EpisodeFields};
pub(crate) use podcast::{PodcastEntry, PodcastFields};
