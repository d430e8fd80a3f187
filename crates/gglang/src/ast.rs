//! AST node shapes produced by the parser and consumed by the evaluator.

use std::rc::Rc;

/// A parsed GGLang program: the top-level statements in source order.
#[derive(Debug, Clone)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// A declared type name such as `int`, `str`, or a class name.
///
/// Only the primitive names (`int`, `float`, `str`, `bool`) are checked at
/// runtime when binding values; any other name is accepted without checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    pub name: String,
}

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A function parameter.
///
/// `is_ref` is parsed but does not change argument passing.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub param_type: TypeName,
    pub is_ref: bool,
}

/// A function declaration, used both for top-level functions and for methods
/// in a class body.
///
/// Declarations are shared behind `Rc` so that the runtime function value can
/// reference the node without cloning the body.
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<TypeName>,
    pub body: Block,
}

/// A braced sequence of statements.
#[derive(Debug, Clone)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

/// Statement nodes.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// `var name: type = value` — both the type and the initializer are
    /// optional; a declaration without an initializer binds the name to the
    /// uninitialized sentinel.
    VarDecl {
        name: String,
        var_type: Option<TypeName>,
        value: Option<Expr>,
    },
    /// `const name = value` — immutability is not enforced at runtime.
    ConstDecl { name: String, value: Expr },
    /// `@name: type = value` inside a method body.
    InstanceVarDecl {
        name: String,
        var_type: Option<TypeName>,
        value: Option<Expr>,
    },
    /// `const @name = value` inside a method body.
    InstanceConstDecl { name: String, value: Expr },
    /// `target = value` where target is a variable, `@field`, property, or
    /// index expression.
    Assignment { target: Expr, value: Expr },
    /// `target op= value` for `+=`, `-=`, `*=`, `/=`.
    CompoundAssignment {
        target: Expr,
        op: BinOpKind,
        value: Expr,
    },
    FuncDecl(Rc<FuncDecl>),
    /// `class Name(Super) { methods }` — the body contains only method
    /// declarations.
    ClassDecl {
        name: String,
        superclass: Option<String>,
        methods: Vec<Rc<FuncDecl>>,
    },
    /// `for variable in iterable { body }`.
    ForLoop {
        variable: String,
        iterable: Expr,
        body: Block,
    },
    /// `try { ... } catch (name) { ... }`.
    TryCatch {
        try_block: Block,
        exception_var: String,
        catch_block: Block,
    },
    Return { value: Option<Expr> },
    Expr(Expr),
}

impl Stmt {
    /// Node kind name used by `--debug` tracing.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::VarDecl { .. } => "VarDecl",
            Self::ConstDecl { .. } => "ConstDecl",
            Self::InstanceVarDecl { .. } => "InstanceVarDecl",
            Self::InstanceConstDecl { .. } => "InstanceConstDecl",
            Self::Assignment { .. } => "Assignment",
            Self::CompoundAssignment { .. } => "CompoundAssignment",
            Self::FuncDecl(_) => "FuncDecl",
            Self::ClassDecl { .. } => "ClassDecl",
            Self::ForLoop { .. } => "ForLoop",
            Self::TryCatch { .. } => "TryCatch",
            Self::Return { .. } => "Return",
            Self::Expr(_) => "ExprStmt",
        }
    }
}

/// Binary operators shared by `BinOp` and `CompoundAssignment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
}

impl BinOpKind {
    /// Source-level spelling, used in error messages.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }
}

/// Pipe operators: `-->` threads the value through the step unchanged, `~~>`
/// coerces it to the declared type of the placeholder parameter first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeOp {
    Plain,
    Coerce,
}

/// A pipeline step modifier: `×N` repetition or `?cond` condition.
#[derive(Debug, Clone)]
pub enum Modifier {
    Repetition(i64),
    Conditional(Expr),
}

/// One `key: value` entry of a dictionary literal.
#[derive(Debug, Clone)]
pub struct KeyValuePair {
    pub key: Expr,
    pub value: Expr,
}

/// Expression nodes.
#[derive(Debug, Clone)]
pub enum Expr {
    Integer(i64),
    Float(f64),
    Str(String),
    /// Literal and expression parts of an `i"..."` string, in order.
    InterpolatedString(Vec<Expr>),
    Variable(String),
    /// `@name` — a field on the enclosing `this`.
    InstanceVar(String),
    Super,
    ArrayLiteral(Vec<Expr>),
    Dictionary(Vec<KeyValuePair>),
    ArrayAccess {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    PropertyAccess {
        object: Box<Expr>,
        name: String,
    },
    /// Property access immediately followed by a call, kept as its own node
    /// so method dispatch does not need to rebuild the bound callee.
    MethodCall {
        object: Box<Expr>,
        name: String,
        args: Vec<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    BinOp {
        left: Box<Expr>,
        op: BinOpKind,
        right: Box<Expr>,
    },
    Ternary {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Pipe {
        left: Box<Expr>,
        op: PipeOp,
        right: Box<Expr>,
    },
    /// `value |> name: type` — binds the evaluated value in the current
    /// environment.
    AssignmentPipe {
        value: Box<Expr>,
        target: String,
        var_type: Option<TypeName>,
    },
    /// `--> name: type` — a pipeline terminus binding the current value.
    TypedPipeTarget {
        name: String,
        var_type: TypeName,
    },
    /// A pipeline step annotated with `×N` / `?cond` modifiers.
    ModifiedExpression {
        expression: Box<Expr>,
        modifiers: Vec<Modifier>,
    },
    /// `&expr` — reference capture syntax, evaluated as a plain value.
    CreateReference(Box<Expr>),
}

impl Expr {
    /// Node kind name used by `--debug` tracing.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Integer(_) => "Integer",
            Self::Float(_) => "Float",
            Self::Str(_) => "String",
            Self::InterpolatedString(_) => "InterpolatedString",
            Self::Variable(_) => "Variable",
            Self::InstanceVar(_) => "InstanceVar",
            Self::Super => "Super",
            Self::ArrayLiteral(_) => "ArrayLiteral",
            Self::Dictionary(_) => "Dictionary",
            Self::ArrayAccess { .. } => "ArrayAccess",
            Self::PropertyAccess { .. } => "PropertyAccess",
            Self::MethodCall { .. } => "MethodCall",
            Self::Call { .. } => "Call",
            Self::BinOp { .. } => "BinOp",
            Self::Ternary { .. } => "Ternary",
            Self::Pipe { .. } => "Pipe",
            Self::AssignmentPipe { .. } => "AssignmentPipe",
            Self::TypedPipeTarget { .. } => "TypedPipeTarget",
            Self::ModifiedExpression { .. } => "ModifiedExpression",
            Self::CreateReference(_) => "CreateReference",
        }
    }
}
