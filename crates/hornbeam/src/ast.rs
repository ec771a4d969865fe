//! ESTree syntax tree consumed by the evaluator
//!
//! Hornbeam does not parse source text. An external parser (acorn, espree,
//! ...) produces an ESTree JSON tree, which is decoded into [`Node`] with
//! `serde`. Node kinds the evaluator does not know decode successfully into
//! [`NodeKind::Unsupported`] so that the failure surfaces at evaluation time,
//! naming the kind and its span.

pub mod build;

use std::fmt;
use std::rc::Rc;

use serde::de::{self, Deserializer};
use serde::Deserialize;

/// Byte offsets of a node within the source text it was parsed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// Offset of the first byte
    pub start: usize,
    /// Offset one past the last byte
    pub end: usize,
}

impl Span {
    /// Create a span from start and end offsets.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The slice of `source` covered by this span, if it is in range.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }

    fn from_json(raw: &serde_json::Value) -> Self {
        let offset = |key: &str| {
            raw.get(key)
                .and_then(serde_json::Value::as_u64)
                .map(|n| n as usize)
                .unwrap_or_default()
        };
        Self::new(offset("start"), offset("end"))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// A syntax tree node: its kind-specific payload plus the source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Kind discriminator and fields
    pub kind: NodeKind,
    /// Where the node came from
    pub span: Span,
}

impl Node {
    /// Create a node.
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Decode an ESTree JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Decode an already-parsed ESTree JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// The ESTree `type` name of this node.
    pub fn kind_name(&self) -> &str {
        self.kind.name()
    }

    /// The identifier name, if this node is an `Identifier`.
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier { name } => Some(name),
            _ => None,
        }
    }

    /// Whether this node is one of the loop statements.
    pub fn is_loop(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::WhileStatement { .. }
                | NodeKind::DoWhileStatement { .. }
                | NodeKind::ForStatement { .. }
                | NodeKind::ForInStatement { .. }
        )
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        let span = Span::from_json(&raw);
        let type_name = raw
            .get("type")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| de::Error::missing_field("type"))?;

        let kind = match NodeKind::deserialize(raw).map_err(de::Error::custom)? {
            NodeKind::Unrecognized => NodeKind::Unsupported(type_name),
            kind => kind,
        };

        Ok(Node { kind, span })
    }
}

/// A bare identifier in a position that can only hold a name
/// (labels, function names).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Ident {
    /// The identifier text
    pub name: String,
}

impl Ident {
    /// Create an identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// `var`, `let` or `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    /// `var`
    Var,
    /// `let`
    Let,
    /// `const`
    Const,
}

/// One `name = init` entry of a variable declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VariableDeclarator {
    /// Binding target (only identifiers are supported)
    pub id: Node,
    /// Initializer, if any
    #[serde(default)]
    pub init: Option<Node>,
}

/// Shared shape of function declarations, function expressions and arrows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Function {
    /// Declared name
    #[serde(default)]
    pub id: Option<Ident>,
    /// Parameter patterns (only identifiers are supported)
    pub params: Vec<Node>,
    /// Block body, or a bare expression for concise arrows
    pub body: Node,
    /// Whether `body` is a concise arrow expression
    #[serde(default)]
    pub expression: bool,
    /// `function*`
    #[serde(default)]
    pub generator: bool,
    /// `async function`
    #[serde(default, rename = "async")]
    pub is_async: bool,
}

/// One `case test:` (or `default:`) clause of a switch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SwitchCase {
    /// The case test, `None` for `default`
    #[serde(default)]
    pub test: Option<Node>,
    /// Statements of the clause
    pub consequent: Vec<Node>,
}

/// The `catch (param) { ... }` part of a try statement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatchClause {
    /// The bound parameter, if any
    #[serde(default)]
    pub param: Option<Node>,
    /// The handler block
    pub body: Node,
}

/// Property flavour inside an object literal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    /// Plain `key: value`
    #[default]
    Init,
    /// `get key() {}`
    Get,
    /// `set key(v) {}`
    Set,
}

/// Value carried by a `Literal` node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    /// `true` / `false`
    Bool(bool),
    /// Numeric literal
    Number(f64),
    /// String literal
    String(String),
    /// Anything else a parser may serialize (regular expressions, bigints)
    Other(serde_json::Value),
}

macro_rules! operators {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $symbol:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $symbol)] $variant ),+
        }

        impl $name {
            /// The operator as written in source.
            pub fn symbol(self) -> &'static str {
                match self {
                    $( $name::$variant => $symbol ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.symbol())
            }
        }
    };
}

operators! {
    /// Operators of `BinaryExpression`.
    BinaryOperator {
        /// `==`
        LooseEq => "==",
        /// `!=`
        LooseNe => "!=",
        /// `===`
        StrictEq => "===",
        /// `!==`
        StrictNe => "!==",
        /// `<`
        Lt => "<",
        /// `<=`
        Le => "<=",
        /// `>`
        Gt => ">",
        /// `>=`
        Ge => ">=",
        /// `<<`
        Shl => "<<",
        /// `>>`
        Shr => ">>",
        /// `>>>`
        UShr => ">>>",
        /// `+`
        Add => "+",
        /// `-`
        Sub => "-",
        /// `*`
        Mul => "*",
        /// `/`
        Div => "/",
        /// `%`
        Rem => "%",
        /// `**`
        Exp => "**",
        /// `|`
        BitOr => "|",
        /// `^`
        BitXor => "^",
        /// `&`
        BitAnd => "&",
        /// `in`
        In => "in",
        /// `instanceof`
        InstanceOf => "instanceof",
    }
}

operators! {
    /// Operators of `LogicalExpression`.
    LogicalOperator {
        /// `&&`
        And => "&&",
        /// `||`
        Or => "||",
        /// `??`
        Nullish => "??",
    }
}

operators! {
    /// Operators of `UnaryExpression`.
    UnaryOperator {
        /// `-`
        Minus => "-",
        /// `+`
        Plus => "+",
        /// `!`
        Not => "!",
        /// `~`
        BitNot => "~",
        /// `typeof`
        TypeOf => "typeof",
        /// `void`
        Void => "void",
        /// `delete`
        Delete => "delete",
    }
}

operators! {
    /// Operators of `UpdateExpression`.
    UpdateOperator {
        /// `++`
        Increment => "++",
        /// `--`
        Decrement => "--",
    }
}

operators! {
    /// Operators of `AssignmentExpression`.
    AssignmentOperator {
        /// `=`
        Assign => "=",
        /// `+=`
        AddAssign => "+=",
        /// `-=`
        SubAssign => "-=",
        /// `*=`
        MulAssign => "*=",
        /// `/=`
        DivAssign => "/=",
        /// `%=`
        RemAssign => "%=",
        /// `**=`
        ExpAssign => "**=",
        /// `<<=`
        ShlAssign => "<<=",
        /// `>>=`
        ShrAssign => ">>=",
        /// `>>>=`
        UShrAssign => ">>>=",
        /// `|=`
        BitOrAssign => "|=",
        /// `^=`
        BitXorAssign => "^=",
        /// `&=`
        BitAndAssign => "&=",
    }
}

impl AssignmentOperator {
    /// The binary operator a compound assignment combines with,
    /// `None` for plain `=`.
    pub fn binary(self) -> Option<BinaryOperator> {
        match self {
            AssignmentOperator::Assign => None,
            AssignmentOperator::AddAssign => Some(BinaryOperator::Add),
            AssignmentOperator::SubAssign => Some(BinaryOperator::Sub),
            AssignmentOperator::MulAssign => Some(BinaryOperator::Mul),
            AssignmentOperator::DivAssign => Some(BinaryOperator::Div),
            AssignmentOperator::RemAssign => Some(BinaryOperator::Rem),
            AssignmentOperator::ExpAssign => Some(BinaryOperator::Exp),
            AssignmentOperator::ShlAssign => Some(BinaryOperator::Shl),
            AssignmentOperator::ShrAssign => Some(BinaryOperator::Shr),
            AssignmentOperator::UShrAssign => Some(BinaryOperator::UShr),
            AssignmentOperator::BitOrAssign => Some(BinaryOperator::BitOr),
            AssignmentOperator::BitXorAssign => Some(BinaryOperator::BitXor),
            AssignmentOperator::BitAndAssign => Some(BinaryOperator::BitAnd),
        }
    }
}

/// Every node kind the evaluator understands, keyed by the ESTree `type` tag.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
#[allow(missing_docs)]
pub enum NodeKind {
    // ═══════════════════════════════════════════════════════════════════
    // Statements
    // ═══════════════════════════════════════════════════════════════════
    Program {
        body: Vec<Node>,
    },
    EmptyStatement,
    ExpressionStatement {
        expression: Box<Node>,
    },
    BlockStatement {
        body: Vec<Node>,
    },
    VariableDeclaration {
        kind: VariableKind,
        declarations: Vec<VariableDeclarator>,
    },
    FunctionDeclaration(Rc<Function>),
    ReturnStatement {
        #[serde(default)]
        argument: Option<Box<Node>>,
    },
    IfStatement {
        test: Box<Node>,
        consequent: Box<Node>,
        #[serde(default)]
        alternate: Option<Box<Node>>,
    },
    SwitchStatement {
        discriminant: Box<Node>,
        cases: Vec<SwitchCase>,
    },
    WhileStatement {
        test: Box<Node>,
        body: Box<Node>,
    },
    DoWhileStatement {
        body: Box<Node>,
        test: Box<Node>,
    },
    ForStatement {
        #[serde(default)]
        init: Option<Box<Node>>,
        #[serde(default)]
        test: Option<Box<Node>>,
        #[serde(default)]
        update: Option<Box<Node>>,
        body: Box<Node>,
    },
    ForInStatement {
        left: Box<Node>,
        right: Box<Node>,
        body: Box<Node>,
    },
    BreakStatement {
        #[serde(default)]
        label: Option<Ident>,
    },
    ContinueStatement {
        #[serde(default)]
        label: Option<Ident>,
    },
    LabeledStatement {
        label: Ident,
        body: Box<Node>,
    },
    ThrowStatement {
        argument: Box<Node>,
    },
    TryStatement {
        block: Box<Node>,
        #[serde(default)]
        handler: Option<Box<CatchClause>>,
        #[serde(default)]
        finalizer: Option<Box<Node>>,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Expressions
    // ═══════════════════════════════════════════════════════════════════
    Identifier {
        name: String,
    },
    Literal {
        #[serde(default)]
        value: Option<LiteralValue>,
        #[serde(default)]
        regex: Option<serde_json::Value>,
        #[serde(default)]
        bigint: Option<String>,
    },
    ThisExpression,
    ArrayExpression {
        elements: Vec<Option<Node>>,
    },
    ObjectExpression {
        properties: Vec<Node>,
    },
    Property {
        key: Box<Node>,
        value: Box<Node>,
        #[serde(default)]
        kind: PropertyKind,
        #[serde(default)]
        computed: bool,
        #[serde(default)]
        shorthand: bool,
        #[serde(default)]
        method: bool,
    },
    FunctionExpression(Rc<Function>),
    ArrowFunctionExpression(Rc<Function>),
    UnaryExpression {
        operator: UnaryOperator,
        argument: Box<Node>,
    },
    UpdateExpression {
        operator: UpdateOperator,
        prefix: bool,
        argument: Box<Node>,
    },
    BinaryExpression {
        operator: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    LogicalExpression {
        operator: LogicalOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    AssignmentExpression {
        operator: AssignmentOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    ConditionalExpression {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    CallExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    NewExpression {
        callee: Box<Node>,
        #[serde(default)]
        arguments: Vec<Node>,
    },
    MemberExpression {
        object: Box<Node>,
        property: Box<Node>,
        #[serde(default)]
        computed: bool,
    },
    SequenceExpression {
        expressions: Vec<Node>,
    },

    /// A node kind outside the supported grammar, carrying its `type` name.
    #[serde(skip)]
    Unsupported(String),

    /// Placeholder produced by the derived decoder for unknown tags; the
    /// [`Node`] decoder replaces it with [`NodeKind::Unsupported`].
    #[doc(hidden)]
    #[serde(other)]
    Unrecognized,
}

impl NodeKind {
    /// The ESTree `type` name of this kind.
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Program { .. } => "Program",
            NodeKind::EmptyStatement => "EmptyStatement",
            NodeKind::ExpressionStatement { .. } => "ExpressionStatement",
            NodeKind::BlockStatement { .. } => "BlockStatement",
            NodeKind::VariableDeclaration { .. } => "VariableDeclaration",
            NodeKind::FunctionDeclaration(_) => "FunctionDeclaration",
            NodeKind::ReturnStatement { .. } => "ReturnStatement",
            NodeKind::IfStatement { .. } => "IfStatement",
            NodeKind::SwitchStatement { .. } => "SwitchStatement",
            NodeKind::WhileStatement { .. } => "WhileStatement",
            NodeKind::DoWhileStatement { .. } => "DoWhileStatement",
            NodeKind::ForStatement { .. } => "ForStatement",
            NodeKind::ForInStatement { .. } => "ForInStatement",
            NodeKind::BreakStatement { .. } => "BreakStatement",
            NodeKind::ContinueStatement { .. } => "ContinueStatement",
            NodeKind::LabeledStatement { .. } => "LabeledStatement",
            NodeKind::ThrowStatement { .. } => "ThrowStatement",
            NodeKind::TryStatement { .. } => "TryStatement",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::Literal { .. } => "Literal",
            NodeKind::ThisExpression => "ThisExpression",
            NodeKind::ArrayExpression { .. } => "ArrayExpression",
            NodeKind::ObjectExpression { .. } => "ObjectExpression",
            NodeKind::Property { .. } => "Property",
            NodeKind::FunctionExpression(_) => "FunctionExpression",
            NodeKind::ArrowFunctionExpression(_) => "ArrowFunctionExpression",
            NodeKind::UnaryExpression { .. } => "UnaryExpression",
            NodeKind::UpdateExpression { .. } => "UpdateExpression",
            NodeKind::BinaryExpression { .. } => "BinaryExpression",
            NodeKind::LogicalExpression { .. } => "LogicalExpression",
            NodeKind::AssignmentExpression { .. } => "AssignmentExpression",
            NodeKind::ConditionalExpression { .. } => "ConditionalExpression",
            NodeKind::CallExpression { .. } => "CallExpression",
            NodeKind::NewExpression { .. } => "NewExpression",
            NodeKind::MemberExpression { .. } => "MemberExpression",
            NodeKind::SequenceExpression { .. } => "SequenceExpression",
            NodeKind::Unsupported(name) => name,
            NodeKind::Unrecognized => "Unknown",
        }
    }
}
