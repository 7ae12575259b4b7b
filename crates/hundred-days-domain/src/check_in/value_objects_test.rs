#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::shared::DomainError;

    #[test]
    fn test_day_number_bounds() {
        assert!(DayNumber::new(1).is_ok());
        assert!(DayNumber::new(100).is_ok());
        assert!(matches!(DayNumber::new(0), Err(DomainError::Validation(_))));
        assert!(matches!(DayNumber::new(101), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_day_number_ordering() {
        let first = DayNumber::new(3).unwrap();
        let second = DayNumber::new(4).unwrap();
        assert!(first < second);
        assert_eq!(second.value(), 4);
    }

    #[test]
    fn test_details_blank_note_dropped() {
        let details = CheckInDetails::new(Some("   ".to_string()), Some("".to_string()), None)
            .unwrap();
        assert!(details.note.is_none());
        assert!(details.quote_id.is_none());
        assert!(!details.has_photo());
    }

    #[test]
    fn test_details_note_too_long() {
        let note = "a".repeat(NOTE_MAX_LEN + 1);
        let result = CheckInDetails::new(Some(note), None, None);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_details_photo_url_must_be_https() {
        let ok = CheckInDetails::new(None, None, Some("https://cdn.example.com/p/1.jpg")).unwrap();
        assert!(ok.has_photo());

        let plain = CheckInDetails::new(None, None, Some("http://cdn.example.com/p/1.jpg"));
        assert!(matches!(plain, Err(DomainError::InvalidInput(_))));

        let garbage = CheckInDetails::new(None, None, Some("not a url"));
        assert!(matches!(garbage, Err(DomainError::InvalidInput(_))));
    }
}
