#[cfg(test)]
mod tests {
    use crate::{
        parsers::{
            lookup_parser::LookupParser,
            parser::{Parser, ReadError},
        },
        tests::fixtures::{write_file, LOOKUP_CSV},
    };
    use std::path::Path;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_lookup_table() {
        let file = write_file(LOOKUP_CSV);
        let table = LookupParser.load(file.path()).unwrap();

        assert_eq!(table.len(), 5);
        assert_eq!(table.get(25, "tcp"), Some("sv_P1"));
        assert_eq!(table.get(68, "udp"), Some("sv_P2"));
        assert_eq!(table.get(23, "tcp"), Some("sv_P1"));
        assert_eq!(table.get(31, "udp"), Some("SV_P3"));
        assert_eq!(table.get(443, "tcp"), Some("sv_P2"));
    }

    #[test]
    fn test_header_only_gives_empty_table() {
        let file = write_file("dstport,protocol,tag\n");
        let table = LookupParser.load(file.path()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_fields_are_trimmed() {
        let file = write_file("dstport,protocol,tag\n 993 , TCP , email \n");
        let table = LookupParser.load(file.path()).unwrap();

        assert_eq!(table.get(993, "tcp"), Some("email"));
    }

    #[test]
    fn test_invalid_rows_are_skipped() {
        let file = write_file(
            "dstport,protocol,tag\n\
             http,tcp,web\n\
             70000,tcp,too_big\n\
             22,,no_protocol\n\
             23,tcp\n\
             24,tcp,\n\
             443,tcp,web\n",
        );
        let table = LookupParser.load(file.path()).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(443, "tcp"), Some("web"));
    }

    #[test]
    fn test_parse_reports_invalid_rows_as_recoverable() {
        let file = write_file("dstport,protocol,tag\nhttp,tcp,web\n80,tcp,web\n");
        let results: Vec<_> = LookupParser.parse(file.path()).unwrap().collect();

        assert_eq!(results.len(), 2);
        match &results[0] {
            Err(err @ ReadError::InvalidRow { row, .. }) => {
                assert_eq!(*row, 1);
                assert!(err.is_recoverable());
            }
            other => panic!("expected an invalid row, got {:?}", other),
        }
        let record = results[1].as_ref().unwrap();
        assert_eq!(record.dstport, 80);
        assert_eq!(record.protocol, "tcp");
        assert_eq!(record.tag, "web");
    }

    #[test]
    fn test_duplicate_keys_last_row_wins() {
        let file = write_file("dstport,protocol,tag\n80,tcp,old\n80,TCP,new\n");
        let table = LookupParser.load(file.path()).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.overridden(), 1);
        assert_eq!(table.get(80, "tcp"), Some("new"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = LookupParser
            .load(Path::new("/nonexistent/lookup.csv"))
            .unwrap_err();

        assert!(matches!(err, ReadError::Io(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_binary_file_loads_nothing() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n', 0xff, 0xfe, b',', 0x00, b'\n'],
        )
        .unwrap();
        let table = LookupParser.load(file.path()).unwrap();
        assert!(table.is_empty());
    }
}
