//! Tree nodes.
//!
//! One variant per construct, each carrying only the fields it uses.
//!
//! | variant | children |
//! |---|---|
//! | `Program` | global declarations, function definitions, top-level statements |
//! | `Function` | parameters, body statements, local declarations |
//! | `FunCall` | arguments |
//! | `Argument` | argument expression |
//! | `Assignment` | right-hand side, index (array targets only) |
//! | `While` | condition, body |
//! | `IfThen` | condition, then-body, else-body |
//! | `Expression` / `RelExpr` | left operand, right operand |
//! | `VarRef` | index (array references only) |
//!
//! `slot` fields hold the frame slot index the front end assigned to a
//! parameter or local at declaration time.

use std::fmt;

use crate::stack::ensure_sufficient_stack;
use crate::{DataType, Text, VarKind};

/// Discriminant of a [`Node`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind {
    Program,
    VarDecl,
    Function,
    StatementBlock,
    FunCall,
    Assignment,
    While,
    IfThen,
    Expression,
    VarRef,
    Constant,
    Argument,
    RelExpr,
}

impl NodeKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Program => "program",
            Self::VarDecl => "variable declaration",
            Self::Function => "function definition",
            Self::StatementBlock => "statement block",
            Self::FunCall => "function call",
            Self::Assignment => "assignment",
            Self::While => "while loop",
            Self::IfThen => "if-then-else",
            Self::Expression => "arithmetic expression",
            Self::VarRef => "variable reference",
            Self::Constant => "constant",
            Self::Argument => "call argument",
            Self::RelExpr => "relational expression",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A syntax tree node. Each node owns its children.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Node {
    Program {
        globals: Vec<Node>,
        functions: Vec<Node>,
        body: Vec<Node>,
    },
    VarDecl {
        name: Text,
        ty: DataType,
        kind: VarKind,
        /// Element count for global arrays.
        size: u32,
        slot: u32,
    },
    Function {
        name: Text,
        params: Vec<Node>,
        body: Vec<Node>,
        locals: Vec<Node>,
    },
    StatementBlock {
        stmts: Vec<Node>,
    },
    FunCall {
        name: Text,
        args: Vec<Node>,
    },
    Assignment {
        name: Text,
        ty: DataType,
        kind: VarKind,
        slot: u32,
        value: Option<Box<Node>>,
        index: Option<Box<Node>>,
    },
    While {
        cond: Option<Box<Node>>,
        body: Vec<Node>,
    },
    IfThen {
        cond: Option<Box<Node>>,
        then_body: Vec<Node>,
        else_body: Vec<Node>,
    },
    Expression {
        op: char,
        left: Option<Box<Node>>,
        right: Option<Box<Node>>,
    },
    VarRef {
        name: Text,
        ty: DataType,
        kind: VarKind,
        slot: u32,
        index: Option<Box<Node>>,
    },
    Constant {
        ty: DataType,
        /// Literal value for integers, string-table id for strings.
        value: i64,
        text: Option<Text>,
    },
    Argument {
        expr: Option<Box<Node>>,
        /// Argument register the value is passed in.
        register: u32,
    },
    RelExpr {
        op: char,
        left: Option<Box<Node>>,
        right: Option<Box<Node>>,
    },
}

impl Node {
    /// Create a node of the given kind with every field defaulted.
    pub fn new(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Program => Self::Program {
                globals: Vec::new(),
                functions: Vec::new(),
                body: Vec::new(),
            },
            NodeKind::VarDecl => Self::VarDecl {
                name: Text::default(),
                ty: DataType::default(),
                kind: VarKind::default(),
                size: 0,
                slot: 0,
            },
            NodeKind::Function => Self::Function {
                name: Text::default(),
                params: Vec::new(),
                body: Vec::new(),
                locals: Vec::new(),
            },
            NodeKind::StatementBlock => Self::StatementBlock { stmts: Vec::new() },
            NodeKind::FunCall => Self::FunCall {
                name: Text::default(),
                args: Vec::new(),
            },
            NodeKind::Assignment => Self::Assignment {
                name: Text::default(),
                ty: DataType::default(),
                kind: VarKind::default(),
                slot: 0,
                value: None,
                index: None,
            },
            NodeKind::While => Self::While {
                cond: None,
                body: Vec::new(),
            },
            NodeKind::IfThen => Self::IfThen {
                cond: None,
                then_body: Vec::new(),
                else_body: Vec::new(),
            },
            NodeKind::Expression => Self::Expression {
                op: '\0',
                left: None,
                right: None,
            },
            NodeKind::VarRef => Self::VarRef {
                name: Text::default(),
                ty: DataType::default(),
                kind: VarKind::default(),
                slot: 0,
                index: None,
            },
            NodeKind::Constant => Self::Constant {
                ty: DataType::default(),
                value: 0,
                text: None,
            },
            NodeKind::Argument => Self::Argument {
                expr: None,
                register: 0,
            },
            NodeKind::RelExpr => Self::RelExpr {
                op: '\0',
                left: None,
                right: None,
            },
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Program { .. } => NodeKind::Program,
            Self::VarDecl { .. } => NodeKind::VarDecl,
            Self::Function { .. } => NodeKind::Function,
            Self::StatementBlock { .. } => NodeKind::StatementBlock,
            Self::FunCall { .. } => NodeKind::FunCall,
            Self::Assignment { .. } => NodeKind::Assignment,
            Self::While { .. } => NodeKind::While,
            Self::IfThen { .. } => NodeKind::IfThen,
            Self::Expression { .. } => NodeKind::Expression,
            Self::VarRef { .. } => NodeKind::VarRef,
            Self::Constant { .. } => NodeKind::Constant,
            Self::Argument { .. } => NodeKind::Argument,
            Self::RelExpr { .. } => NodeKind::RelExpr,
        }
    }

    /// The node's name or literal text, if it carries one.
    pub fn text(&self) -> Option<&Text> {
        match self {
            Self::VarDecl { name, .. }
            | Self::Function { name, .. }
            | Self::FunCall { name, .. }
            | Self::Assignment { name, .. }
            | Self::VarRef { name, .. } => Some(name),
            Self::Constant { text, .. } => text.as_ref(),
            _ => None,
        }
    }

    /// Children in slot order: child 0, child 1, child 2, with list slots
    /// expanded in sequence order.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        let [a, b, c]: [&[Node]; 3] = match self {
            Self::Program {
                globals,
                functions,
                body,
            } => [globals.as_slice(), functions.as_slice(), body.as_slice()],
            Self::Function {
                params,
                body,
                locals,
                ..
            } => [params.as_slice(), body.as_slice(), locals.as_slice()],
            Self::StatementBlock { stmts } => [stmts.as_slice(), NONE, NONE],
            Self::FunCall { args, .. } => [args.as_slice(), NONE, NONE],
            Self::Assignment { value, index, .. } => [slot(value), slot(index), NONE],
            Self::While { cond, body } => [slot(cond), body.as_slice(), NONE],
            Self::IfThen {
                cond,
                then_body,
                else_body,
            } => [slot(cond), then_body.as_slice(), else_body.as_slice()],
            Self::Expression { left, right, .. } | Self::RelExpr { left, right, .. } => {
                [slot(left), slot(right), NONE]
            }
            Self::VarRef { index, .. } => [slot(index), NONE, NONE],
            Self::Argument { expr, .. } => [slot(expr), NONE, NONE],
            Self::VarDecl { .. } | Self::Constant { .. } => [NONE, NONE, NONE],
        };
        a.iter().chain(b).chain(c)
    }

    /// Depth-first pre-order walk: the node, then its children in slot order.
    ///
    /// `depth` is passed to `visit` for each node and increases by one per level.
    pub fn walk<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a Node, usize)) {
        ensure_sufficient_stack(|| {
            visit(self, depth);
            for child in self.children() {
                child.walk(depth + 1, visit);
            }
        });
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(0, &mut |_, _| count += 1);
        count
    }

    /// Number of owned text payloads in this subtree.
    pub fn owned_text_count(&self) -> usize {
        let mut count = 0;
        self.walk(0, &mut |node, _| {
            if node.text().is_some_and(Text::is_owned) {
                count += 1;
            }
        });
        count
    }
}

const NONE: &[Node] = &[];

fn slot(child: &Option<Box<Node>>) -> &[Node] {
    child.as_deref().map_or(NONE, std::slice::from_ref)
}

// Construction helpers, used by the front end to build trees bottom-up.

fn boxed(node: Node) -> Option<Box<Node>> {
    Some(Box::new(node))
}

impl Node {
    pub fn program(globals: Vec<Node>, functions: Vec<Node>, body: Vec<Node>) -> Self {
        Self::Program {
            globals,
            functions,
            body,
        }
    }

    /// Global scalar declaration.
    pub fn global(name: impl Into<Text>, ty: DataType) -> Self {
        Self::VarDecl {
            name: name.into(),
            ty,
            kind: VarKind::Global,
            size: 0,
            slot: 0,
        }
    }

    /// Global integer array declaration with `size` elements.
    pub fn global_array(name: impl Into<Text>, size: u32) -> Self {
        Self::VarDecl {
            name: name.into(),
            ty: DataType::Int,
            kind: VarKind::GlobalArray,
            size,
            slot: 0,
        }
    }

    /// Parameter declaration stored in frame slot `slot`.
    pub fn param(name: impl Into<Text>, ty: DataType, slot: u32) -> Self {
        Self::VarDecl {
            name: name.into(),
            ty,
            kind: VarKind::Param,
            size: 0,
            slot,
        }
    }

    /// Local declaration stored in frame slot `slot`.
    pub fn local(name: impl Into<Text>, ty: DataType, slot: u32) -> Self {
        Self::VarDecl {
            name: name.into(),
            ty,
            kind: VarKind::Local,
            size: 0,
            slot,
        }
    }

    pub fn function(
        name: impl Into<Text>,
        params: Vec<Node>,
        locals: Vec<Node>,
        body: Vec<Node>,
    ) -> Self {
        Self::Function {
            name: name.into(),
            params,
            body,
            locals,
        }
    }

    pub fn block(stmts: Vec<Node>) -> Self {
        Self::StatementBlock { stmts }
    }

    /// Call statement. Each expression becomes an [`Node::Argument`] bound
    /// to the argument register matching its position.
    pub fn call(name: impl Into<Text>, args: Vec<Node>) -> Self {
        let args = args
            .into_iter()
            .zip(0u32..)
            .map(|(expr, register)| Self::Argument {
                expr: boxed(expr),
                register,
            })
            .collect();
        Self::FunCall {
            name: name.into(),
            args,
        }
    }

    /// Assignment to a scalar variable (global, local or parameter).
    pub fn assign(
        name: impl Into<Text>,
        kind: VarKind,
        slot: u32,
        value: Node,
    ) -> Self {
        Self::Assignment {
            name: name.into(),
            ty: DataType::Int,
            kind,
            slot,
            value: boxed(value),
            index: None,
        }
    }

    /// Assignment to an element of a global array.
    pub fn assign_index(name: impl Into<Text>, index: Node, value: Node) -> Self {
        Self::Assignment {
            name: name.into(),
            ty: DataType::Int,
            kind: VarKind::GlobalArray,
            slot: 0,
            value: boxed(value),
            index: boxed(index),
        }
    }

    pub fn while_loop(cond: Node, body: Vec<Node>) -> Self {
        Self::While {
            cond: boxed(cond),
            body,
        }
    }

    pub fn if_then(cond: Node, then_body: Vec<Node>, else_body: Vec<Node>) -> Self {
        Self::IfThen {
            cond: boxed(cond),
            then_body,
            else_body,
        }
    }

    pub fn binary(op: char, left: Node, right: Node) -> Self {
        Self::Expression {
            op,
            left: boxed(left),
            right: boxed(right),
        }
    }

    pub fn relational(op: char, left: Node, right: Node) -> Self {
        Self::RelExpr {
            op,
            left: boxed(left),
            right: boxed(right),
        }
    }

    /// Scalar variable reference.
    pub fn var(name: impl Into<Text>, kind: VarKind, slot: u32) -> Self {
        Self::VarRef {
            name: name.into(),
            ty: DataType::Int,
            kind,
            slot,
            index: None,
        }
    }

    /// Global array element reference.
    pub fn var_index(name: impl Into<Text>, index: Node) -> Self {
        Self::VarRef {
            name: name.into(),
            ty: DataType::Int,
            kind: VarKind::GlobalArray,
            slot: 0,
            index: boxed(index),
        }
    }

    pub fn int(value: i64) -> Self {
        Self::Constant {
            ty: DataType::Int,
            value,
            text: None,
        }
    }

    /// String literal registered under string-table id `id`.
    pub fn string(id: i64, text: impl Into<Text>) -> Self {
        Self::Constant {
            ty: DataType::String,
            value: id,
            text: Some(text.into()),
        }
    }

    /// Reads the value returned by the most recent call.
    pub fn return_value() -> Self {
        Self::Constant {
            ty: DataType::ReturnValue,
            value: 0,
            text: None,
        }
    }
}
