use prettytable::{Cell, Row, Table};

use crate::{
    osd::OsdVolume,
    volume::{TAG_OSD_FSID, TAG_OSD_ID, TAG_TYPE, Volume},
};

pub fn log_volumes(vols: &[Volume]) {
    if vols.is_empty() {
        tracing::info!("<no ceph volumes>");
        return;
    }

    let mut table = Table::new();
    table.set_titles(Row::new(vec![
        Cell::new("OSD"),
        Cell::new("Type"),
        Cell::new("OSD FSID"),
        Cell::new("Path"),
        Cell::new("VG/LV"),
    ]));

    for v in vols {
        // half-tagged volumes are still listed so they can be fixed by hand
        let (id, kind, fsid) = match OsdVolume::try_from(v) {
            Ok(osd) => (osd.osd_id, osd.kind.to_string(), osd.osd_fsid),
            Err(_) => (
                v.tag(TAG_OSD_ID).unwrap_or("?").to_string(),
                v.tag(TAG_TYPE).unwrap_or("?").to_string(),
                v.tag(TAG_OSD_FSID).unwrap_or("?").to_string(),
            ),
        };
        table.add_row(Row::new(vec![
            Cell::new(&id),
            Cell::new(&kind),
            Cell::new(&fsid),
            Cell::new(&v.path.display().to_string()),
            Cell::new(&format!("{}/{}", v.vg, v.name)),
        ]));
    }

    table.printstd();
}
