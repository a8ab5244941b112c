#[macro_export]
macro_rules! regex {
    ($e: expr) => {{
        use ::once_cell::sync::Lazy;
        use ::regex::Regex;
        static PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new($e).unwrap());
        &*PATTERN
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_regex() {
        assert!(regex!(r"^\d+$").is_match("2024"));
        assert!(!regex!(r"^\d+$").is_match("7.5/10"));
    }
}
