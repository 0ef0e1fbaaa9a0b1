//! JNI type signatures: building them from class descriptors when resolving
//! members, and parsing them for validation.

use std::fmt;
use std::str::FromStr;

use combine::{
    between, choice, many, many1, parser, satisfy, token, ParseError, Parser, StdParseResult,
    Stream,
};

use crate::class::ClassDesc;
use crate::errors::{Error, Result};

/// A primitive Java type, i.e. anything representable without an object.
#[allow(missing_docs)]
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Primitive {
    Boolean, // Z
    Byte,    // B
    Char,    // C
    Double,  // D
    Float,   // F
    Int,     // I
    Long,    // J
    Short,   // S
    Void,    // V
}

impl Primitive {
    fn descriptor(self) -> char {
        match self {
            Primitive::Boolean => 'Z',
            Primitive::Byte => 'B',
            Primitive::Char => 'C',
            Primitive::Double => 'D',
            Primitive::Float => 'F',
            Primitive::Int => 'I',
            Primitive::Long => 'J',
            Primitive::Short => 'S',
            Primitive::Void => 'V',
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.descriptor())
    }
}

/// Any Java field type descriptor.
#[allow(missing_docs)]
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum JavaType {
    Primitive(Primitive),
    Object(String),
    Array(Box<JavaType>),
}

impl FromStr for JavaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parser(parse_type)
            .parse(s)
            .map(|res| res.0)
            .map_err(|_| Error::InvalidSignature(s.to_owned()))
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            JavaType::Primitive(ty) => ty.fmt(f),
            JavaType::Object(ref name) => write!(f, "L{name};"),
            JavaType::Array(ref ty) => write!(f, "[{ty}"),
        }
    }
}

/// A method signature such as `(Ljava/lang/String;I)V`: the argument type
/// descriptors followed by the return type descriptor.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TypeSignature {
    /// Argument types, in declaration order.
    pub args: Vec<JavaType>,
    /// Return type.
    pub ret: JavaType,
}

impl TypeSignature {
    /// Builds the signature for a member taking `args` and returning `ret`,
    /// where each type is given by its class descriptor. The descriptors'
    /// signature strings are parsed, so a malformed descriptor is rejected
    /// here rather than handed to the JVM.
    pub fn for_member(args: &[&ClassDesc], ret: &ClassDesc) -> Result<Self> {
        let args = args
            .iter()
            .map(|class| class.type_sig().parse())
            .collect::<Result<Vec<_>>>()?;
        Ok(TypeSignature {
            args,
            ret: ret.type_sig().parse()?,
        })
    }
}

impl FromStr for TypeSignature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parser(parse_sig)
            .parse(s)
            .map(|res| res.0)
            .map_err(|_| Error::InvalidSignature(s.to_owned()))
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for a in &self.args {
            write!(f, "{a}")?;
        }
        write!(f, "){}", self.ret)
    }
}

fn parse_primitive<S: Stream<Token = char>>(input: &mut S) -> StdParseResult<Primitive, S>
where
    S::Error: ParseError<char, S::Range, S::Position>,
{
    choice((
        token('Z').map(|_| Primitive::Boolean),
        token('B').map(|_| Primitive::Byte),
        token('C').map(|_| Primitive::Char),
        token('D').map(|_| Primitive::Double),
        token('F').map(|_| Primitive::Float),
        token('I').map(|_| Primitive::Int),
        token('J').map(|_| Primitive::Long),
        token('S').map(|_| Primitive::Short),
        token('V').map(|_| Primitive::Void),
    ))
    .parse_stream(input)
    .into()
}

fn parse_object<S: Stream<Token = char>>(input: &mut S) -> StdParseResult<JavaType, S>
where
    S::Error: ParseError<char, S::Range, S::Position>,
{
    between(token('L'), token(';'), many1(satisfy(|c| c != ';')))
        .map(JavaType::Object)
        .parse_stream(input)
        .into()
}

fn parse_array<S: Stream<Token = char>>(input: &mut S) -> StdParseResult<JavaType, S>
where
    S::Error: ParseError<char, S::Range, S::Position>,
{
    (token('['), parser(parse_type))
        .map(|(_, ty)| JavaType::Array(Box::new(ty)))
        .parse_stream(input)
        .into()
}

fn parse_type<S: Stream<Token = char>>(input: &mut S) -> StdParseResult<JavaType, S>
where
    S::Error: ParseError<char, S::Range, S::Position>,
{
    choice((
        parser(parse_primitive).map(JavaType::Primitive),
        parser(parse_array),
        parser(parse_object),
    ))
    .parse_stream(input)
    .into()
}

fn parse_sig<S: Stream<Token = char>>(input: &mut S) -> StdParseResult<TypeSignature, S>
where
    S::Error: ParseError<char, S::Range, S::Position>,
{
    (
        between(token('('), token(')'), many(parser(parse_type))),
        parser(parse_type),
    )
        .map(|(args, ret)| TypeSignature { args, ret })
        .parse_stream(input)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_and_displays_round_trip() {
        let inputs = [
            "(Ljava/lang/String;I)V",
            "()Ljava/lang/Object;",
            "([I[[Ljava/lang/String;)J",
            "()Z",
        ];
        for input in inputs {
            let sig: TypeSignature = input.parse().unwrap();
            assert_eq!(sig.to_string(), input);
        }
    }

    #[test]
    fn rejects_unterminated_object_descriptor() {
        let res: Result<TypeSignature> = "()Ljava/lang/List".parse();
        assert_matches!(res, Err(Error::InvalidSignature(ref s)) if s == "()Ljava/lang/List");
    }

    #[test]
    fn builds_member_signature_from_descriptors() {
        static STRING: ClassDesc = ClassDesc::new("java/lang/String", "Ljava/lang/String;");
        static INT: ClassDesc = ClassDesc::new("int", "I");
        static VOID: ClassDesc = ClassDesc::new("void", "V");

        let sig = TypeSignature::for_member(&[&STRING, &INT], &VOID).unwrap();
        assert_eq!(sig.to_string(), "(Ljava/lang/String;I)V");

        let none: &[&ClassDesc] = &[];
        let sig = TypeSignature::for_member(none, &STRING).unwrap();
        assert_eq!(sig.to_string(), "()Ljava/lang/String;");
    }

    #[test]
    fn rejects_malformed_descriptor_in_builder() {
        static BROKEN: ClassDesc = ClassDesc::new("broken", "Qbroken");
        static VOID: ClassDesc = ClassDesc::new("void", "V");
        assert_matches!(
            TypeSignature::for_member(&[&BROKEN], &VOID),
            Err(Error::InvalidSignature(_))
        );
    }
}
