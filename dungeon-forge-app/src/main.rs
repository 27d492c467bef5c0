//! # Dungeon Forge Application (Binary)
//!
//! Main executable entry point.

fn main() -> anyhow::Result<()> {
    dungeon_forge_app::main()
}
