pub mod temperature {
    /// Round to the nearest whole degree, halves going up (`-2.5` is `-2`).
    pub fn round(temp_c: f64) -> i64 {
        // `as` saturates, and `-0.0` casts to plain 0
        (temp_c + 0.5).floor() as i64
    }

    pub fn celsius(temp_c: f64) -> String {
        format!("{}°C", round(temp_c))
    }

    #[test]
    fn test_temperature() {
        assert_eq!(celsius(21.6), "22°C");
        assert_eq!(celsius(21.4), "21°C");
        assert_eq!(celsius(-0.2), "0°C");
        assert_eq!(celsius(-3.7), "-4°C");
        assert_eq!(celsius(2.5), "3°C");
        assert_eq!(celsius(-2.5), "-2°C");
        assert_eq!(celsius(-0.5), "0°C");
        assert_eq!(round(-0.4), 0);
    }
}

pub mod speed {
    /// Wind speed as the provider reports it, unit appended
    pub fn kph(speed: f64) -> String {
        format!("{speed} km/h")
    }

    #[test]
    fn test_speed() {
        assert_eq!(kph(3.6), "3.6 km/h");
        assert_eq!(kph(4.0), "4 km/h");
    }
}

pub mod clock {
    /// 12-hour wall clock, e.g. `6:03 AM`. Midnight and noon read as 12.
    pub fn twelve_hour(hour: u32, minute: u32) -> String {
        let suffix = if hour >= 12 { "PM" } else { "AM" };
        let hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{hour}:{minute:02} {suffix}")
    }

    #[test]
    fn test_twelve_hour() {
        assert_eq!(twelve_hour(0, 0), "12:00 AM");
        assert_eq!(twelve_hour(6, 3), "6:03 AM");
        assert_eq!(twelve_hour(12, 30), "12:30 PM");
        assert_eq!(twelve_hour(15, 2), "3:02 PM");
        assert_eq!(twelve_hour(23, 59), "11:59 PM");
    }
}
