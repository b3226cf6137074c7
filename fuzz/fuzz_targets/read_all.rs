#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use dbfreader::{Table, TableEncoding, TableOptions};

// The record count comes from the header, huge counts only make runs slow
const MAX_RECORDS: usize = 10_000;

fuzz_target!(|data: &[u8]| {
    for encoding in TableEncoding::ALL {
        let options = TableOptions::new().with_encoding(encoding);
        let Ok(mut table) = Table::open(Cursor::new(data), options) else {
            return;
        };
        if table.num_records() > MAX_RECORDS {
            return;
        }
        let _ = dbfreader::export(&mut table, std::io::sink());
        let _ = table.record_to_json(0, true);
    }
});
