pub mod shikimori;
