use htorrent::core::swarm::memory::Torrent;
use htorrent_primitives::info_hash::InfoHash;
use htorrent_test_helpers::random;

pub const DESCRIPTION: &str = "hello";

/// Length of the video in the sample torrent.
pub const VIDEO_LENGTH: usize = 64 * 1024;

/// 2017-03-30T23:30:01Z
pub const CREATION_DATE: i64 = 1_490_916_601;

#[must_use]
pub fn random_info_hash() -> InfoHash {
    InfoHash(random::info_hash_bytes())
}

/// A multi-file torrent with a description and a video.
#[must_use]
pub fn sample_torrent(video: Vec<u8>) -> Torrent {
    Torrent::new(random_info_hash(), "Sintel")
        .with_creation_date(CREATION_DATE)
        .with_file("Sintel/Sintel.txt", DESCRIPTION)
        .with_file("Sintel/Sintel.mp4", video)
}
