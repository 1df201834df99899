pub mod album;
pub mod artist;
pub mod genre;
pub mod ids;
pub mod notification;
pub mod permission;
pub mod profile;
pub mod song;
pub mod user;

pub use album::{Album, AlbumDetails, NewAlbum};
pub use artist::{Artist, ArtistDetails, NewArtist};
pub use genre::Genre;
pub use ids::{AlbumId, ArtistId, GenreId, ResourceId, SongId, UserId};
pub use notification::Notification;
pub use permission::{ParseKindError, Permission, ResourceKind, ResourcePermission};
pub use profile::{NewProfile, Profile};
pub use song::{Couplet, Lyrics, NewSong, Song, SongDetails};
pub use user::{NewUser, Role, User};
