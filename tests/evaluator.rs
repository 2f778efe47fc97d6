#[cfg(test)]
mod evaluator_tests {
    use calcline as calc;

    use calc::arith::Reduce;
    use calc::environment::Environment;
    use calc::error::{CalcError, Result};
    use calc::evaluator::Evaluator;
    use calc::line::Line;
    use calc::value::Value;
    use pretty_assertions::assert_eq;

    fn eval(evaluator: &mut Evaluator<'_>, raw: &str) -> Result<String> {
        evaluator.evaluate_str(raw).map(|v| v.to_string())
    }

    #[test]
    fn test_scalar_assignment_round_trip() {
        let mut env = Environment::new();
        let mut evaluator = Evaluator::new(&mut env);

        assert_eq!(eval(&mut evaluator, "$X=( 2 + 10 )").unwrap(), "12");
        assert_eq!(evaluator.environment().get_variable_value("$X").unwrap(), "12");
    }

    #[test]
    fn test_precedence() {
        let mut env = Environment::new();
        let mut evaluator = Evaluator::new(&mut env);

        assert_eq!(eval(&mut evaluator, "2 + 3 * 4").unwrap(), "14");
    }

    #[test]
    fn test_variables_and_arrays() {
        let mut env = Environment::new();
        env.register_variable("$TWO", "2").unwrap();
        let mut evaluator = Evaluator::new(&mut env);

        eval(&mut evaluator, "$ASS=( 2 + 10 )").unwrap();
        assert_eq!(eval(&mut evaluator, "$ASS / $TWO").unwrap(), "6");

        assert_eq!(evaluator.evaluate_str("@ARRAY=[ 2,3 ]").unwrap(), Value::Nop);
        assert_eq!(eval(&mut evaluator, "ARRAY[0] + 2").unwrap(), "4");
        assert_eq!(eval(&mut evaluator, "ARRAY[1] / 2").unwrap(), "1.5");
    }

    #[test]
    fn test_staged_precedence() {
        let mut env = Environment::new();
        let mut evaluator = Evaluator::new(&mut env);

        eval(&mut evaluator, "$PRECEDENCE=( 2 + 9 )").unwrap();
        assert_eq!(eval(&mut evaluator, "22 / $PRECEDENCE").unwrap(), "2");
    }

    #[test]
    fn test_negative_intermediate_values() {
        let mut env = Environment::new();
        let mut evaluator = Evaluator::new(&mut env);

        assert_eq!(eval(&mut evaluator, "$NEG=( 2 - 5 )").unwrap(), "-3");
        assert_eq!(eval(&mut evaluator, "1 - $NEG").unwrap(), "4");
        assert_eq!(eval(&mut evaluator, "2 * $NEG").unwrap(), "-6");
    }

    #[test]
    fn test_reassignment_is_forbidden() {
        let mut env = Environment::new();
        let mut evaluator = Evaluator::new(&mut env);

        eval(&mut evaluator, "$X=( 1 )").unwrap();
        assert!(matches!(
            eval(&mut evaluator, "$X=( 2 )"),
            Err(CalcError::DuplicateName { .. })
        ));
        assert_eq!(evaluator.environment().get_variable_value("$X").unwrap(), "1");

        eval(&mut evaluator, "@A=[ 1 ]").unwrap();
        assert!(matches!(
            eval(&mut evaluator, "@A=[ 2 ]"),
            Err(CalcError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_function_dispatch() {
        let mut env = Environment::with_prelude();
        let mut evaluator = Evaluator::new(&mut env);

        eval(&mut evaluator, "@ARRAY=[ 2,3,9 ]").unwrap();
        assert_eq!(eval(&mut evaluator, "#SUM( @ARRAY )").unwrap(), "14");
        assert_eq!(eval(&mut evaluator, "#MAX( @ARRAY )").unwrap(), "9");
        assert_eq!(eval(&mut evaluator, "#COUNT( @ARRAY )").unwrap(), "3");

        eval(&mut evaluator, "$X=( 5 )").unwrap();
        assert_eq!(eval(&mut evaluator, "#SUM( $X )").unwrap(), "5");

        // calls never write to the environment
        assert_eq!(evaluator.environment().len(), 2);
    }

    fn shout(args: &[String]) -> std::result::Result<String, String> {
        Ok(args.join("|"))
    }

    #[test]
    fn test_user_function() {
        let mut env = Environment::new();
        env.register_function("#JOIN", shout).unwrap();
        env.register_variable("@L", "1,2,3").unwrap();
        let mut evaluator = Evaluator::new(&mut env);

        assert_eq!(
            evaluator.evaluate_str("#JOIN( @L )").unwrap(),
            Value::Text("1|2|3".into())
        );
    }

    #[test]
    fn test_function_errors() {
        let mut env = Environment::with_prelude();
        let mut evaluator = Evaluator::new(&mut env);

        // unknown function is reported before the argument is looked up
        assert!(matches!(
            eval(&mut evaluator, "#NOPE( @MISSING )"),
            Err(CalcError::NotFound { name }) if name == "#NOPE"
        ));
        assert!(matches!(
            eval(&mut evaluator, "#SUM( @MISSING )"),
            Err(CalcError::NotFound { name }) if name == "@MISSING"
        ));
    }

    #[test]
    fn test_division_by_zero_leaves_environment_unchanged() {
        let mut env = Environment::new();
        env.register_variable("$ZERO", "0").unwrap();
        let mut evaluator = Evaluator::new(&mut env);

        assert!(matches!(
            eval(&mut evaluator, "$X=( 1 / $ZERO )"),
            Err(CalcError::DivisionByZero)
        ));
        assert!(!evaluator.environment().contains("$X"));
        assert_eq!(evaluator.environment().len(), 1);
    }

    #[test]
    fn test_overflow_never_writes_its_target() {
        let mut env = Environment::new();
        let mut evaluator = Evaluator::new(&mut env);

        assert!(matches!(
            eval(&mut evaluator, "$X=( 1e300 * 1e300 )"),
            Err(CalcError::MalformedExpression { .. })
        ));
        assert!(!evaluator.environment().contains("$X"));

        assert!(matches!(
            eval(&mut evaluator, "1e400 * 1"),
            Err(CalcError::InvalidSymbol { .. })
        ));
    }

    #[test]
    fn test_multi_character_operator_tokens() {
        let mut env = Environment::new();
        let mut evaluator = Evaluator::new(&mut env);

        // a trailing sign binds to the next operand
        assert_eq!(eval(&mut evaluator, "2 +- 3").unwrap(), "-1");
        assert_eq!(eval(&mut evaluator, "2 -3").unwrap(), "-1");

        assert!(matches!(
            eval(&mut evaluator, "2 */ 3"),
            Err(CalcError::MalformedExpression { .. })
        ));
        assert!(matches!(
            eval(&mut evaluator, "2 +-- 3"),
            Err(CalcError::MalformedExpression { .. })
        ));
    }

    #[test]
    fn test_empty_array_element_is_rejected() {
        let mut env = Environment::new();
        let mut evaluator = Evaluator::new(&mut env);

        assert!(matches!(
            eval(&mut evaluator, "@A=[ 1,,2 ]"),
            Err(CalcError::MalformedSeparator { .. })
        ));
        assert!(matches!(
            eval(&mut evaluator, "A[1] + 1"),
            Err(CalcError::NotFound { .. })
        ));
    }

    #[test]
    fn test_environment_mut_registers_through_evaluator() {
        let mut env = Environment::new();
        let mut evaluator = Evaluator::new(&mut env);

        evaluator
            .environment_mut()
            .register_function("#JOIN", shout)
            .unwrap();
        evaluator
            .environment_mut()
            .register_variable("$X", "4")
            .unwrap();

        assert_eq!(eval(&mut evaluator, "#JOIN( $X )").unwrap(), "4");
        assert_eq!(eval(&mut evaluator, "$X * 2").unwrap(), "8");
    }

    #[test]
    fn test_failed_line_does_not_poison_environment() {
        let mut env = Environment::new();
        let mut evaluator = Evaluator::new(&mut env);

        assert!(eval(&mut evaluator, "$Y=( $MISSING + 1 )").is_err());
        assert!(!evaluator.environment().contains("$Y"));
        assert_eq!(eval(&mut evaluator, "$Y=( 1 + 1 )").unwrap(), "2");
    }

    #[test]
    fn test_resolved_line_evaluates_the_same() {
        let mut env = Environment::new();
        env.register_variable("$A", "3").unwrap();

        let mut line = Line::parse("$A * 2").unwrap();
        line.resolve(&env).unwrap();
        line.resolve(&env).unwrap();

        let mut evaluator = Evaluator::new(&mut env);
        assert_eq!(evaluator.evaluate(&mut line).unwrap(), Value::Number(6.0));
    }

    /// Reducer that only knows how to add, to check the seam is honoured.
    struct AddOnly;

    impl Reduce for AddOnly {
        fn reduce(&self, expr: &str) -> Result<f64> {
            expr.split('+')
                .map(|part| {
                    part.parse::<f64>()
                        .map_err(|_| CalcError::malformed(expr, "add only"))
                })
                .sum()
        }
    }

    #[test]
    fn test_custom_reducer() {
        let mut env = Environment::new();
        let mut evaluator = Evaluator::with_reducer(&mut env, AddOnly);

        assert_eq!(evaluator.evaluate_str("1 + 2").unwrap(), Value::Number(3.0));
        assert!(matches!(
            evaluator.evaluate_str("1 * 2"),
            Err(CalcError::MalformedExpression { .. })
        ));
    }
}
