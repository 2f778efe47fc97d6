#[cfg(test)]
mod symbol_tests {
    use calcline as calc;

    use calc::environment::Environment;
    use calc::error::CalcError;
    use calc::symbol::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classification_order() {
        assert!(matches!(Symbol::classify("$VAR").unwrap(), Symbol::Variable(_)));
        assert_eq!(Symbol::classify("+").unwrap(), Symbol::Operator("+".into()));
        assert_eq!(Symbol::classify("2.5").unwrap(), Symbol::Number(2.5));
        assert!(matches!(Symbol::classify("ARR[3]").unwrap(), Symbol::Element(_)));
    }

    #[test]
    fn test_operator_check_wins_over_number() {
        // contains '-', so it is an operator token, not a negative literal
        assert_eq!(Symbol::classify("-3").unwrap(), Symbol::Operator("-3".into()));
        assert_eq!(Symbol::classify("1e-5").unwrap(), Symbol::Operator("1e-5".into()));
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(Symbol::classify("  42 ").unwrap(), Symbol::Number(42.0));
    }

    #[test]
    fn test_invalid_symbols() {
        for token in ["abc", "$lower", "@ARR", "#SUM", "inf", "NaN", "ARR[x]", ""] {
            match Symbol::classify(token) {
                Err(CalcError::InvalidSymbol { token: t }) => assert_eq!(t, token.trim()),
                other => panic!("expected InvalidSymbol for {:?}, got {:?}", token, other),
            }
        }
    }

    #[test]
    fn test_overflowing_literal_is_not_a_number() {
        assert!(matches!(
            Symbol::classify("1e400"),
            Err(CalcError::InvalidSymbol { token }) if token == "1e400"
        ));
        assert_eq!(Symbol::classify("1e300").unwrap(), Symbol::Number(1e300));
    }

    #[test]
    fn test_rendering_uses_values_not_names() {
        let var = Symbol::classify("$X").unwrap();
        assert_eq!(var.to_string(), "0");
        assert_eq!(var.lexeme(), "$X");

        let mut env = Environment::new();
        env.register_variable("$X", "7").unwrap();

        let resolved = var.resolve(&env).unwrap();
        assert_eq!(resolved.to_string(), "7");
        assert_eq!(resolved.reference().map(Reference::is_resolved), Some(true));
        assert_eq!(Symbol::Number(12.0).to_string(), "12");
    }

    #[test]
    fn test_resolve_propagates_lookup_failure() {
        let env = Environment::new();
        let element = Symbol::classify("ARR[0]").unwrap();

        assert!(matches!(
            element.resolve(&env),
            Err(CalcError::NotFound { name }) if name == "@ARR"
        ));
    }
}
