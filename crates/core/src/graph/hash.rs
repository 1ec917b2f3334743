//! Stable byte encoding and fingerprinting for determinism checks.
//! The seed is left out so that two seeds producing the same layout compare equal.

use xxhash_rust::xxh3::xxh3_64;

use super::DungeonGraph;

impl DungeonGraph {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.total_floors() as u32).to_le_bytes());
        bytes.extend(self.entry_id.0.to_le_bytes());
        match self.boss_id {
            Some(boss) => {
                bytes.push(1);
                bytes.extend(boss.0.to_le_bytes());
            }
            None => bytes.push(0),
        }

        bytes.extend((self.nodes.len() as u32).to_le_bytes());
        for node in &self.nodes {
            bytes.extend(node.id.0.to_le_bytes());
            bytes.extend((node.floor as u32).to_le_bytes());
            bytes.push(node.room_type.code());
        }

        bytes.extend((self.edges.len() as u32).to_le_bytes());
        for edge in &self.edges {
            bytes.extend(edge.from.0.to_le_bytes());
            bytes.extend(edge.to.0.to_le_bytes());
            bytes.push(edge.edge_type.code());
        }
        bytes
    }

    /// 64-bit xxh3 digest of [`Self::canonical_bytes`].
    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}
