//! Display names handed to bots at game creation.

use rand::seq::SliceRandom;
use rand::Rng;

pub const NAME_POOL: [&str; 24] = [
    "Alder", "Bramble", "Cinder", "Dorian", "Echo", "Fennel", "Garnet", "Hollis", "Indigo",
    "Juniper", "Kestrel", "Linden", "Marlow", "Nettle", "Onyx", "Piper", "Quill", "Rowan",
    "Sable", "Thistle", "Umber", "Vesper", "Wren", "Yarrow",
];

/// `count` distinct names drawn from the pool, capped at the pool size.
pub fn pick_bot_names<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<String> {
    let mut pool = NAME_POOL.to_vec();
    pool.shuffle(rng);
    pool.into_iter().take(count).map(str::to_string).collect()
}
