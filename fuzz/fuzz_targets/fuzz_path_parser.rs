#![no_main]

use libfuzzer_sys::fuzz_target;
use pathweaver_core::{parse_path, write_path, PlannerOptions};

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(path) = parse_path("fuzz", content, &PlannerOptions::default()) else {
        return;
    };

    // Geladene Pfade sind konsistent und lassen sich erneut schreiben und lesen
    assert_eq!(path.splines().len(), path.len() - 1);
    assert!(path.start().is_tangent_locked() && path.end().is_tangent_locked());
    let text = write_path(&path).expect("geladener Pfad muss schreibbar sein");
    let reloaded = parse_path("fuzz", &text, &PlannerOptions::default())
        .expect("geschriebener Pfad muss lesbar sein");
    assert_eq!(reloaded.len(), path.len());
});
