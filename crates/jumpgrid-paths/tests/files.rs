use std::path::PathBuf;
use std::sync::Arc;

use jumpgrid_core::GridMap;
use jumpgrid_paths::jump::JUMP_DB_SUFFIX;
use jumpgrid_paths::{
    FlexibleAstar, GridExpansion, Jps2Plus, JpsPlus, JumpDatabase, OctileHeuristic, Scenario, check_batch,
    run_batch,
};

const MAP: &str = "type octile\nheight 6\nwidth 8\nmap\n\
    ........\n\
    .@@@....\n\
    ...@..@.\n\
    ...@..@.\n\
    ......@.\n\
    ........\n";

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("jumpgrid-it-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

fn db_path(map_path: &std::path::Path) -> PathBuf {
    PathBuf::from(format!("{}{JUMP_DB_SUFFIX}", map_path.display()))
}

#[test]
fn database_is_built_once_and_reused() {
    let map_path = temp_file("reuse.map", MAP);
    let db_file = db_path(&map_path);
    let _ = std::fs::remove_file(&db_file);

    let map = Arc::new(GridMap::load(&map_path).unwrap());
    assert_eq!(map.filename(), Some(map_path.as_path()));
    let built = JumpDatabase::load_or_build(&map).unwrap();
    assert_eq!(JumpDatabase::path_for(&map_path), db_file);
    let written = std::fs::read(&db_file).unwrap();
    assert_eq!(written.len(), 4 + 2 * built.len());
    assert_eq!(
        u32::from_le_bytes([written[0], written[1], written[2], written[3]]) as usize,
        built.len()
    );

    let reloaded = JumpDatabase::load_or_build(&map).unwrap();
    assert_eq!(reloaded, built);

    let h = OctileHeuristic::new(map.padded_width());
    let mut plus = FlexibleAstar::new(h, JpsPlus::load_or_build(map.clone()).unwrap());
    let mut plus2 = FlexibleAstar::new(h, Jps2Plus::load_or_build(map.clone()).unwrap());
    let mut reference = FlexibleAstar::new(h, GridExpansion::new(map.clone()));
    let (s, g) = (map.to_padded_id(0, 2), map.to_padded_id(7, 2));
    let expected = reference.path_cost(s, g);
    assert_eq!(plus.path_cost(s, g), expected);
    assert_eq!(plus2.path_cost(s, g), expected);

    std::fs::remove_file(&db_file).unwrap();
    std::fs::remove_file(&map_path).unwrap();
}

#[test]
fn stale_database_is_rebuilt() {
    let map_path = temp_file("stale.map", MAP);
    let db_file = db_path(&map_path);
    // a database for some other map: three labels
    std::fs::write(&db_file, [3, 0, 0, 0, 1, 0, 2, 0, 3, 0]).unwrap();

    let map = Arc::new(GridMap::load(&map_path).unwrap());
    let db = JumpDatabase::load_or_build(&map).unwrap();
    assert_eq!(db.len(), JumpDatabase::records_for(&map));
    assert_eq!(db, JumpDatabase::build(&map).unwrap());
    let rewritten = std::fs::read(&db_file).unwrap();
    assert_eq!(rewritten.len(), 4 + 2 * db.len());

    std::fs::remove_file(&db_file).unwrap();
    std::fs::remove_file(&map_path).unwrap();
}

#[test]
fn scenario_batch_is_optimal() {
    let map_path = temp_file("batch.map", MAP);
    let map = Arc::new(GridMap::load(&map_path).unwrap());
    let scen = Scenario::parse(
        "version 1\n\
         0\tbatch.map\t8\t6\t0\t2\t7\t2\t10.41421356\n\
         0\tbatch.map\t8\t6\t0\t0\t7\t5\t10.24264069\n\
         0\tbatch.map\t8\t6\t4\t2\t5\t3\t1.41421356\n\
         0\tbatch.map\t8\t6\t2\t2\t0\t5\t3.82842712\n",
    )
    .unwrap();
    let db = Arc::new(JumpDatabase::build(&map).unwrap());

    let results = run_batch(&map, scen.experiments(), || {
        FlexibleAstar::new(
            OctileHeuristic::new(map.padded_width()),
            JpsPlus::new(map.clone(), db.clone()).unwrap(),
        )
    });
    assert_eq!(results.len(), scen.len());
    check_batch(scen.experiments(), &results).unwrap();
    assert!(results.iter().all(|r| r.stats.nodes_expanded > 0));

    std::fs::remove_file(&map_path).unwrap();
}
