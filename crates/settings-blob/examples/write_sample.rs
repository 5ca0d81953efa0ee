//! Writes a small sample blob, e.g. for trying out `settings-blob-dump`.

use std::fs;

use settings_blob::{encode_blob, ConfigBlobBuilder};

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample.config".to_string());

    let blob = ConfigBlobBuilder::new()
        .block("global", |b| b.data(b"log_path=syslog\0mail_plugins=quota\0".as_slice()))
        .block("imap", |b| b
            .data(b"mail_max_userip_connections=20\0".as_slice())
            .filter("protocol=imap")
        )
        .block("submission-relay", |b| b
            .filter(r#"protocol=submission AND local_name="smtp.example.com""#)
            .base_error(b"submission_relay_host: Unknown host".as_slice())
        )
        .build();

    let bytes = encode_blob(&blob).expect("Failed to encode");
    fs::write(&path, &bytes).expect("Failed to write file");
    println!("Wrote {} blocks ({} bytes) to {}", blob.len(), bytes.len(), path);
}
