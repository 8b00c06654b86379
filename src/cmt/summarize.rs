//! Reduce every environment in a typed tree to its summary.
//!
//! Full environments hold the binding tables of every enclosing scope and
//! dominate the size of an annotation file. Tooling can rebuild them from the
//! summary chain, so by default they are stored reduced.
//!
//! The walk visits children before the node itself. Matches are exhaustive
//! with no wildcard arms: adding a node kind to the typed tree fails to
//! compile here until the new kind is handled.

use super::cmt_file::{BinaryAnnots, BinaryPart};
use crate::types::Env;
use crate::types::typedtree::*;

/// Summarize a structure.
pub fn summarize_structure(mut s: Structure) -> Structure {
    structure(&mut s);
    s
}

/// Summarize a signature.
pub fn summarize_signature(mut sg: Signature) -> Signature {
    signature(&mut sg);
    sg
}

/// Summarize a single fragment.
pub fn summarize_part(mut part: BinaryPart) -> BinaryPart {
    binary_part(&mut part);
    part
}

/// Summarize annotations. Packed units carry no tree and are returned as is.
pub fn summarize_annots(annots: BinaryAnnots) -> BinaryAnnots {
    match annots {
        BinaryAnnots::Packed(sg, files) => BinaryAnnots::Packed(sg, files),
        BinaryAnnots::Implementation(s) => BinaryAnnots::Implementation(summarize_structure(s)),
        BinaryAnnots::Interface(sg) => BinaryAnnots::Interface(summarize_signature(sg)),
        BinaryAnnots::PartialImplementation(parts) => BinaryAnnots::PartialImplementation(
            parts.into_iter().map(summarize_part).collect(),
        ),
        BinaryAnnots::PartialInterface(parts) => {
            BinaryAnnots::PartialInterface(parts.into_iter().map(summarize_part).collect())
        }
    }
}

/// Summarize a bare environment.
pub fn summarize_env(env: &Env) -> Env {
    env.keep_only_summary()
}

fn env(env: &mut Env) {
    if !env.is_summary() {
        *env = env.keep_only_summary();
    }
}

fn binary_part(part: &mut BinaryPart) {
    match part {
        BinaryPart::PartialStructure(s) => structure(s),
        BinaryPart::PartialStructureItem(item) => structure_item(item),
        BinaryPart::PartialExpression(e) => expression(e),
        BinaryPart::PartialPattern(p) => pattern(p),
        BinaryPart::PartialClassExpr(ce) => class_expr(ce),
        BinaryPart::PartialSignature(sg) => signature(sg),
        BinaryPart::PartialSignatureItem(item) => signature_item(item),
        BinaryPart::PartialModuleType(mty) => module_type(mty),
    }
}

// ============================================================================
// Patterns and Expressions
// ============================================================================

fn pattern(p: &mut Pattern) {
    match &mut p.pat_desc {
        PatternDesc::Tpat_any | PatternDesc::Tpat_var(..) | PatternDesc::Tpat_constant(_) => {}
        PatternDesc::Tpat_alias(inner, _, _) | PatternDesc::Tpat_lazy(inner) => pattern(inner),
        PatternDesc::Tpat_tuple(ps)
        | PatternDesc::Tpat_construct(_, _, ps)
        | PatternDesc::Tpat_array(ps) => ps.iter_mut().for_each(pattern),
        PatternDesc::Tpat_variant(_, arg) => {
            if let Some(arg) = arg {
                pattern(arg);
            }
        }
        PatternDesc::Tpat_record(fields, _) => {
            for (_, _, p, _) in fields {
                pattern(p);
            }
        }
        PatternDesc::Tpat_or(a, b) => {
            pattern(a);
            pattern(b);
        }
    }
    for (extra, _, _) in &mut p.pat_extra {
        match extra {
            PatExtra::Tpat_constraint(ct) => core_type(ct),
            PatExtra::Tpat_open(_, _, e) => env(e),
            PatExtra::Tpat_type(..) | PatExtra::Tpat_unpack => {}
        }
    }
    env(&mut p.pat_env);
}

fn expression(e: &mut Expression) {
    match &mut e.exp_desc {
        ExpressionDesc::Texp_ident(..)
        | ExpressionDesc::Texp_constant(_)
        | ExpressionDesc::Texp_new(..)
        | ExpressionDesc::Texp_unreachable
        | ExpressionDesc::Texp_extension_constructor(..) => {}
        ExpressionDesc::Texp_let(_, vbs, body) => {
            vbs.iter_mut().for_each(value_binding);
            expression(body);
        }
        ExpressionDesc::Texp_function { cases: cs, .. } => cases(cs),
        ExpressionDesc::Texp_apply { funct, args, .. } => {
            expression(funct);
            apply_args(args);
        }
        ExpressionDesc::Texp_match(scrutinee, value_cases, exn_cases, _) => {
            expression(scrutinee);
            cases(value_cases);
            cases(exn_cases);
        }
        ExpressionDesc::Texp_try(body, handlers) => {
            expression(body);
            cases(handlers);
        }
        ExpressionDesc::Texp_tuple(es)
        | ExpressionDesc::Texp_construct(_, _, es)
        | ExpressionDesc::Texp_array(es) => es.iter_mut().for_each(expression),
        ExpressionDesc::Texp_variant(_, arg) => {
            if let Some(arg) = arg {
                expression(arg);
            }
        }
        ExpressionDesc::Texp_record {
            fields,
            extended_expression,
        } => {
            for (_, def) in fields {
                match def {
                    RecordLabelDefinition::Kept(_) => {}
                    RecordLabelDefinition::Overridden(_, e) => expression(e),
                }
            }
            if let Some(e) = extended_expression {
                expression(e);
            }
        }
        ExpressionDesc::Texp_field(e, _, _)
        | ExpressionDesc::Texp_assert(e)
        | ExpressionDesc::Texp_lazy(e) => expression(e),
        ExpressionDesc::Texp_setfield(a, _, _, b)
        | ExpressionDesc::Texp_sequence(a, b)
        | ExpressionDesc::Texp_while(a, b) => {
            expression(a);
            expression(b);
        }
        ExpressionDesc::Texp_ifthenelse(cond, then_, else_) => {
            expression(cond);
            expression(then_);
            if let Some(else_) = else_ {
                expression(else_);
            }
        }
        ExpressionDesc::Texp_for(_, _, low, high, _, body) => {
            expression(low);
            expression(high);
            expression(body);
        }
        ExpressionDesc::Texp_send(obj, _, arg) => {
            expression(obj);
            if let Some(arg) = arg {
                expression(arg);
            }
        }
        ExpressionDesc::Texp_letmodule(_, _, mexpr, body) => {
            module_expr(mexpr);
            expression(body);
        }
        ExpressionDesc::Texp_letexception(ext, body) => {
            extension_constructor(ext);
            expression(body);
        }
        ExpressionDesc::Texp_object(cstr, _) => class_structure(cstr),
        ExpressionDesc::Texp_pack(mexpr) => module_expr(mexpr),
    }
    for (extra, _, _) in &mut e.exp_extra {
        match extra {
            ExpExtra::Texp_constraint(ct) => core_type(ct),
            ExpExtra::Texp_coerce(from, to) => {
                if let Some(from) = from {
                    core_type(from);
                }
                core_type(to);
            }
            ExpExtra::Texp_open(_, _, _, e) => env(e),
            ExpExtra::Texp_poly(ct) => {
                if let Some(ct) = ct {
                    core_type(ct);
                }
            }
            ExpExtra::Texp_newtype(_) => {}
        }
    }
    env(&mut e.exp_env);
}

fn apply_args(args: &mut [(crate::types::ArgLabel, Option<Expression>)]) {
    for (_, arg) in args {
        if let Some(arg) = arg {
            expression(arg);
        }
    }
}

fn cases(cs: &mut [Case]) {
    for c in cs {
        pattern(&mut c.c_lhs);
        if let Some(guard) = &mut c.c_guard {
            expression(guard);
        }
        expression(&mut c.c_rhs);
    }
}

fn value_binding(vb: &mut ValueBinding) {
    pattern(&mut vb.vb_pat);
    expression(&mut vb.vb_expr);
}

// ============================================================================
// Core Types
// ============================================================================

fn core_type(ct: &mut CoreType) {
    match &mut ct.ctyp_desc {
        CoreTypeDesc::Ttyp_any | CoreTypeDesc::Ttyp_var(_) => {}
        CoreTypeDesc::Ttyp_arrow(_, a, b) => {
            core_type(a);
            core_type(b);
        }
        CoreTypeDesc::Ttyp_tuple(cts)
        | CoreTypeDesc::Ttyp_constr(_, _, cts)
        | CoreTypeDesc::Ttyp_class(_, _, cts) => cts.iter_mut().for_each(core_type),
        CoreTypeDesc::Ttyp_object(fields, _) => {
            for field in fields {
                match field {
                    ObjectField::OTtag(_, _, ct) | ObjectField::OTinherit(ct) => core_type(ct),
                }
            }
        }
        CoreTypeDesc::Ttyp_alias(inner, _) | CoreTypeDesc::Ttyp_poly(_, inner) => {
            core_type(inner)
        }
        CoreTypeDesc::Ttyp_variant(rows, _, _) => {
            for row in rows {
                match row {
                    RowField::Ttag(_, _, _, cts) => cts.iter_mut().for_each(core_type),
                    RowField::Tinherit(ct) => core_type(ct),
                }
            }
        }
        CoreTypeDesc::Ttyp_package(pack) => {
            for (_, ct) in &mut pack.pack_fields {
                core_type(ct);
            }
        }
    }
    env(&mut ct.ctyp_env);
}

// ============================================================================
// Modules
// ============================================================================

fn module_expr(me: &mut ModuleExpr) {
    match &mut me.mod_desc {
        ModuleExprDesc::Tmod_ident(..) => {}
        ModuleExprDesc::Tmod_structure(s) => structure(s),
        ModuleExprDesc::Tmod_functor(_, _, param, body) => {
            if let Some(param) = param {
                module_type(param);
            }
            module_expr(body);
        }
        ModuleExprDesc::Tmod_apply(funct, arg, coercion) => {
            module_expr(funct);
            module_expr(arg);
            module_coercion(coercion);
        }
        ModuleExprDesc::Tmod_constraint(inner, _, constraint, coercion) => {
            module_expr(inner);
            match constraint {
                ModuleTypeConstraint::Tmodtype_implicit => {}
                ModuleTypeConstraint::Tmodtype_explicit(mty) => module_type(mty),
            }
            module_coercion(coercion);
        }
        ModuleExprDesc::Tmod_unpack(e, _) => expression(e),
    }
    env(&mut me.mod_env);
}

fn module_coercion(c: &mut ModuleCoercion) {
    match c {
        ModuleCoercion::Tcoerce_none | ModuleCoercion::Tcoerce_primitive(_) => {}
        ModuleCoercion::Tcoerce_structure(fields, ids) => {
            for (_, c) in fields {
                module_coercion(c);
            }
            for (_, _, c) in ids {
                module_coercion(c);
            }
        }
        ModuleCoercion::Tcoerce_functor(arg, res) => {
            module_coercion(arg);
            module_coercion(res);
        }
        ModuleCoercion::Tcoerce_alias(e, _, inner) => {
            module_coercion(inner);
            env(e);
        }
    }
}

fn module_type(mty: &mut ModuleTypeExpr) {
    match &mut mty.mty_desc {
        ModuleTypeDesc::Tmty_ident(..) | ModuleTypeDesc::Tmty_alias(..) => {}
        ModuleTypeDesc::Tmty_signature(sg) => signature(sg),
        ModuleTypeDesc::Tmty_functor(_, _, param, body) => {
            if let Some(param) = param {
                module_type(param);
            }
            module_type(body);
        }
        ModuleTypeDesc::Tmty_with(inner, constraints) => {
            module_type(inner);
            for (_, _, constraint) in constraints {
                match constraint {
                    WithConstraint::Twith_type(decl) | WithConstraint::Twith_typesubst(decl) => {
                        type_declaration(decl)
                    }
                    WithConstraint::Twith_module(..) | WithConstraint::Twith_modsubst(..) => {}
                }
            }
        }
        ModuleTypeDesc::Tmty_typeof(me) => module_expr(me),
    }
    env(&mut mty.mty_env);
}

fn open_declaration(od: &mut OpenDeclaration) {
    env(&mut od.open_env);
}

// ============================================================================
// Structures and Signatures
// ============================================================================

fn structure(s: &mut Structure) {
    s.str_items.iter_mut().for_each(structure_item);
    env(&mut s.str_final_env);
}

fn structure_item(item: &mut StructureItem) {
    match &mut item.str_desc {
        StructureItemDesc::Tstr_eval(e, _) => expression(e),
        StructureItemDesc::Tstr_value(_, vbs) => vbs.iter_mut().for_each(value_binding),
        StructureItemDesc::Tstr_primitive(vd) => value_description(vd),
        StructureItemDesc::Tstr_type(_, decls) => decls.iter_mut().for_each(type_declaration),
        StructureItemDesc::Tstr_typext(ext) => type_extension(ext),
        StructureItemDesc::Tstr_exception(ext) => extension_constructor(ext),
        StructureItemDesc::Tstr_module(mb) => module_expr(&mut mb.mb_expr),
        StructureItemDesc::Tstr_recmodule(mbs) => {
            for mb in mbs {
                module_expr(&mut mb.mb_expr);
            }
        }
        StructureItemDesc::Tstr_modtype(mtd) => module_type_declaration(mtd),
        StructureItemDesc::Tstr_open(od) => open_declaration(od),
        StructureItemDesc::Tstr_class(classes) => {
            for (decl, _) in classes {
                class_infos(decl, class_expr);
            }
        }
        StructureItemDesc::Tstr_class_type(decls) => {
            for (_, _, decl) in decls {
                class_infos(decl, class_type);
            }
        }
        StructureItemDesc::Tstr_include(incl) => module_expr(&mut incl.incl_mod),
        StructureItemDesc::Tstr_attribute(_) => {}
    }
    env(&mut item.str_env);
}

fn signature(sg: &mut Signature) {
    sg.sig_items.iter_mut().for_each(signature_item);
    env(&mut sg.sig_final_env);
}

fn signature_item(item: &mut SignatureItem) {
    match &mut item.sig_desc {
        SignatureItemDesc::Tsig_value(vd) => value_description(vd),
        SignatureItemDesc::Tsig_type(_, decls) => decls.iter_mut().for_each(type_declaration),
        SignatureItemDesc::Tsig_typext(ext) => type_extension(ext),
        SignatureItemDesc::Tsig_exception(ext) => extension_constructor(ext),
        SignatureItemDesc::Tsig_module(md) => module_type(&mut md.md_type),
        SignatureItemDesc::Tsig_recmodule(mds) => {
            for md in mds {
                module_type(&mut md.md_type);
            }
        }
        SignatureItemDesc::Tsig_modtype(mtd) => module_type_declaration(mtd),
        SignatureItemDesc::Tsig_open(od) => open_declaration(od),
        SignatureItemDesc::Tsig_include(incl) => module_type(&mut incl.incl_mod),
        SignatureItemDesc::Tsig_class(decls) | SignatureItemDesc::Tsig_class_type(decls) => {
            for decl in decls {
                class_infos(decl, class_type);
            }
        }
        SignatureItemDesc::Tsig_attribute(_) => {}
    }
    env(&mut item.sig_env);
}

fn module_type_declaration(mtd: &mut ModuleTypeDeclaration) {
    if let Some(mty) = &mut mtd.mtd_type {
        module_type(mty);
    }
}

// ============================================================================
// Declarations
// ============================================================================

fn value_description(vd: &mut ValueDescription) {
    core_type(&mut vd.val_desc);
}

fn type_declaration(decl: &mut TypeDeclaration) {
    for (ct, _) in &mut decl.typ_params {
        core_type(ct);
    }
    for (a, b, _) in &mut decl.typ_cstrs {
        core_type(a);
        core_type(b);
    }
    match &mut decl.typ_kind {
        TypeKind::Ttype_abstract | TypeKind::Ttype_open => {}
        TypeKind::Ttype_variant(cds) => {
            for cd in cds {
                constructor_arguments(&mut cd.cd_args);
                if let Some(res) = &mut cd.cd_res {
                    core_type(res);
                }
            }
        }
        TypeKind::Ttype_record(lds) => label_declarations(lds),
    }
    if let Some(manifest) = &mut decl.typ_manifest {
        core_type(manifest);
    }
}

fn label_declarations(lds: &mut [LabelDeclaration]) {
    for ld in lds {
        core_type(&mut ld.ld_type);
    }
}

fn constructor_arguments(args: &mut ConstructorArguments) {
    match args {
        ConstructorArguments::Cstr_tuple(cts) => cts.iter_mut().for_each(core_type),
        ConstructorArguments::Cstr_record(lds) => label_declarations(lds),
    }
}

fn type_extension(ext: &mut TypeExtension) {
    for (ct, _) in &mut ext.tyext_params {
        core_type(ct);
    }
    ext.tyext_constructors
        .iter_mut()
        .for_each(extension_constructor);
}

fn extension_constructor(ext: &mut ExtensionConstructor) {
    match &mut ext.ext_kind {
        ExtensionConstructorKind::Text_decl(args, res) => {
            constructor_arguments(args);
            if let Some(res) = res {
                core_type(res);
            }
        }
        ExtensionConstructorKind::Text_rebind(..) => {}
    }
}

// ============================================================================
// Classes
// ============================================================================

fn class_infos<T>(ci: &mut ClassInfos<T>, expr: fn(&mut T)) {
    for (ct, _) in &mut ci.ci_params {
        core_type(ct);
    }
    expr(&mut ci.ci_expr);
}

fn class_expr(ce: &mut ClassExpr) {
    match &mut ce.cl_desc {
        ClassExprDesc::Tcl_ident(_, _, cts) => cts.iter_mut().for_each(core_type),
        ClassExprDesc::Tcl_structure(cstr) => class_structure(cstr),
        ClassExprDesc::Tcl_fun(_, pat, defaults, body, _) => {
            pattern(pat);
            for (_, _, e) in defaults {
                expression(e);
            }
            class_expr(body);
        }
        ClassExprDesc::Tcl_apply(funct, args) => {
            class_expr(funct);
            apply_args(args);
        }
        ClassExprDesc::Tcl_let(_, vbs, ivars, body) => {
            vbs.iter_mut().for_each(value_binding);
            for (_, _, e) in ivars {
                expression(e);
            }
            class_expr(body);
        }
        ClassExprDesc::Tcl_constraint(inner, cty, _, _) => {
            class_expr(inner);
            if let Some(cty) = cty {
                class_type(cty);
            }
        }
        ClassExprDesc::Tcl_open(_, _, _, e, body) => {
            class_expr(body);
            env(e);
        }
    }
    env(&mut ce.cl_env);
}

fn class_structure(cstr: &mut ClassStructure) {
    pattern(&mut cstr.cstr_self);
    for field in &mut cstr.cstr_fields {
        match &mut field.cf_desc {
            ClassFieldDesc::Tcf_inherit(_, ce, _) => class_expr(ce),
            ClassFieldDesc::Tcf_val(_, _, _, kind) | ClassFieldDesc::Tcf_method(_, _, kind) => {
                match kind {
                    ClassFieldKind::Tcfk_virtual(ct) => core_type(ct),
                    ClassFieldKind::Tcfk_concrete(_, e) => expression(e),
                }
            }
            ClassFieldDesc::Tcf_constraint(a, b) => {
                core_type(a);
                core_type(b);
            }
            ClassFieldDesc::Tcf_initializer(e) => expression(e),
            ClassFieldDesc::Tcf_attribute(_) => {}
        }
    }
}

fn class_type(cty: &mut ClassType) {
    match &mut cty.cltyp_desc {
        ClassTypeDesc::Tcty_constr(_, _, cts) => cts.iter_mut().for_each(core_type),
        ClassTypeDesc::Tcty_signature(csig) => {
            core_type(&mut csig.csig_self);
            for field in &mut csig.csig_fields {
                match &mut field.ctf_desc {
                    ClassTypeFieldDesc::Tctf_inherit(inner) => class_type(inner),
                    ClassTypeFieldDesc::Tctf_val(_, _, _, ct)
                    | ClassTypeFieldDesc::Tctf_method(_, _, _, ct) => core_type(ct),
                    ClassTypeFieldDesc::Tctf_constraint(a, b) => {
                        core_type(a);
                        core_type(b);
                    }
                    ClassTypeFieldDesc::Tctf_attribute(_) => {}
                }
            }
        }
        ClassTypeDesc::Tcty_arrow(_, ct, res) => {
            core_type(ct);
            class_type(res);
        }
        ClassTypeDesc::Tcty_open(_, _, _, e, body) => {
            class_type(body);
            env(e);
        }
    }
    env(&mut cty.cltyp_env);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::Ident;
    use crate::location::{Located, Location};
    use crate::types::decl::ValueKind;
    use crate::types::{
        Constant, Longident, OverrideFlag, Path, PrivateFlag, RecFlag, TypeDesc, TypeExpr,
        Variance, VirtualFlag, decl,
    };

    fn int() -> TypeExpr {
        TypeExpr::constr(Path::pident(Ident::create_persistent("int")), 1)
    }

    fn int_value() -> decl::ValueDescription {
        decl::ValueDescription {
            val_type: int(),
            val_kind: ValueKind::ValReg,
            val_loc: Location::none(),
            val_attributes: vec![],
        }
    }

    fn full_env() -> Env {
        let mut env = Env::empty();
        env.add_type(
            Ident::create_local("t"),
            decl::TypeDeclaration {
                type_params: vec![],
                type_arity: 0,
                type_kind: decl::TypeKind::TypeAbstract,
                type_private: PrivateFlag::Public,
                type_manifest: None,
                type_loc: Location::none(),
                type_attributes: vec![],
            },
        );
        env.add_functor_arg(Ident::create_local("X"));
        env.add_module(
            Ident::create_local("N"),
            decl::ModuleDeclaration {
                md_type: decl::ModuleType::MtySignature(vec![]),
                md_attributes: vec![],
                md_loc: Location::none(),
            },
        );
        env.add_modtype(
            Ident::create_local("S"),
            decl::ModtypeDeclaration {
                mtd_type: None,
                mtd_attributes: vec![],
                mtd_loc: Location::none(),
            },
        );
        env.add_value(Ident::create_local("y"), int_value());
        env
    }

    fn constant(n: i32) -> Expression {
        Expression::new(
            ExpressionDesc::Texp_constant(Constant::Int(n)),
            Location::none(),
            int(),
            full_env(),
        )
    }

    fn open_env() -> Env {
        let mut env = full_env();
        env.add_open(Path::pident(Ident::create_persistent("Js")));
        env
    }

    /// `let x = Js.(1 + 2)` with every environment still full.
    fn sample_structure() -> Structure {
        let x = Ident::create_local("x");
        let pat = Pattern::new(
            PatternDesc::Tpat_var(x, Located::mknoloc("x".into())),
            Location::none(),
            int(),
            full_env(),
        );
        let mut body = Expression::new(
            ExpressionDesc::Texp_apply {
                funct: Box::new(constant(0)),
                args: vec![
                    (Default::default(), Some(constant(1))),
                    (Default::default(), Some(constant(2))),
                ],
                partial: false,
            },
            Location::none(),
            int(),
            full_env(),
        );
        body.exp_extra.push((
            ExpExtra::Texp_open(
                OverrideFlag::Fresh,
                Path::pident(Ident::create_persistent("Js")),
                Located::mknoloc(Longident::Lident("Js".into())),
                open_env(),
            ),
            Location::none(),
            vec![],
        ));
        let item = StructureItem {
            str_desc: StructureItemDesc::Tstr_value(
                RecFlag::Nonrecursive,
                vec![ValueBinding {
                    vb_pat: pat,
                    vb_expr: body,
                    vb_attributes: vec![],
                    vb_loc: Location::none(),
                }],
            ),
            str_loc: Location::none(),
            str_env: full_env(),
        };
        Structure {
            str_items: vec![item],
            str_type: vec![],
            str_final_env: full_env(),
        }
    }

    fn all_summarized(s: &Structure) -> bool {
        let StructureItemDesc::Tstr_value(_, vbs) = &s.str_items[0].str_desc else {
            return false;
        };
        let vb = &vbs[0];
        let ExpressionDesc::Texp_apply { funct, args, .. } = &vb.vb_expr.exp_desc else {
            return false;
        };
        let ExpExtra::Texp_open(_, _, _, open_env) = &vb.vb_expr.exp_extra[0].0 else {
            return false;
        };
        s.str_final_env.is_summary()
            && s.str_items[0].str_env.is_summary()
            && vb.vb_pat.pat_env.is_summary()
            && vb.vb_expr.exp_env.is_summary()
            && funct.exp_env.is_summary()
            && args
                .iter()
                .all(|(_, a)| a.as_ref().is_some_and(|a| a.exp_env.is_summary()))
            && open_env.is_summary()
    }

    fn js() -> Path {
        Path::pident(Ident::create_persistent("Js"))
    }

    fn js_txt() -> Loc<Longident> {
        Located::mknoloc(Longident::Lident("Js".into()))
    }

    /// `int` as written in an annotation.
    fn int_annotation() -> CoreType {
        CoreType {
            ctyp_desc: CoreTypeDesc::Ttyp_constr(
                Path::pident(Ident::create_persistent("int")),
                Located::mknoloc(Longident::Lident("int".into())),
                vec![],
            ),
            ctyp_type: int(),
            ctyp_env: full_env(),
            ctyp_loc: Location::none(),
            ctyp_attributes: vec![],
        }
    }

    fn open_js() -> OpenDeclaration {
        OpenDeclaration {
            open_path: js(),
            open_txt: js_txt(),
            open_override: OverrideFlag::Fresh,
            open_env: open_env(),
            open_loc: Location::none(),
            open_attributes: vec![],
        }
    }

    fn empty_structure() -> Structure {
        Structure {
            str_items: vec![],
            str_type: vec![],
            str_final_env: full_env(),
        }
    }

    /// `{}` as a module type.
    fn empty_module_type() -> ModuleTypeExpr {
        ModuleTypeExpr {
            mty_desc: ModuleTypeDesc::Tmty_signature(Signature {
                sig_items: vec![],
                sig_type: vec![],
                sig_final_env: full_env(),
            }),
            mty_type: decl::ModuleType::MtySignature(vec![]),
            mty_env: full_env(),
            mty_loc: Location::none(),
            mty_attributes: vec![],
        }
    }

    /// `Js.(t<int>)` as a class type.
    fn opened_class_type() -> ClassType {
        let body = ClassType {
            cltyp_desc: ClassTypeDesc::Tcty_constr(
                Path::pident(Ident::create_local("t")),
                Located::mknoloc(Longident::Lident("t".into())),
                vec![int_annotation()],
            ),
            cltyp_env: open_env(),
            cltyp_loc: Location::none(),
            cltyp_attributes: vec![],
        };
        ClassType {
            cltyp_desc: ClassTypeDesc::Tcty_open(
                OverrideFlag::Fresh,
                js(),
                js_txt(),
                open_env(),
                Box::new(body),
            ),
            cltyp_env: full_env(),
            cltyp_loc: Location::none(),
            cltyp_attributes: vec![],
        }
    }

    /// `Js.(fun (Js.(_)) -> object end)` as a class expression.
    fn opened_class_expr() -> ClassExpr {
        let class_expr = |cl_desc: ClassExprDesc| ClassExpr {
            cl_desc,
            cl_loc: Location::none(),
            cl_env: full_env(),
            cl_attributes: vec![],
        };
        let object = class_expr(ClassExprDesc::Tcl_structure(ClassStructure {
            cstr_self: Pattern::new(PatternDesc::Tpat_any, Location::none(), int(), full_env()),
            cstr_fields: vec![],
            cstr_type: int(),
        }));
        let mut param = Pattern::new(PatternDesc::Tpat_any, Location::none(), int(), full_env());
        param.pat_extra.push((
            PatExtra::Tpat_open(js(), js_txt(), open_env()),
            Location::none(),
            vec![],
        ));
        let fun = class_expr(ClassExprDesc::Tcl_fun(
            Default::default(),
            param,
            vec![],
            Box::new(object),
            Partial::Total,
        ));
        class_expr(ClassExprDesc::Tcl_open(
            OverrideFlag::Fresh,
            js(),
            js_txt(),
            open_env(),
            Box::new(fun),
        ))
    }

    fn class_named<T>(name: &str, body: T) -> ClassInfos<T> {
        ClassInfos {
            ci_virt: VirtualFlag::Concrete,
            ci_params: vec![(int_annotation(), Variance::Invariant)],
            ci_id_name: Located::mknoloc(name.into()),
            ci_id_class: Ident::create_local(name),
            ci_expr: body,
            ci_loc: Location::none(),
            ci_attributes: vec![],
        }
    }

    /// `open Js; let x: int; module M: {}; class c: Js.(t<int>)`
    fn sample_signature() -> Signature {
        let item = |sig_desc: SignatureItemDesc| SignatureItem {
            sig_desc,
            sig_env: full_env(),
            sig_loc: Location::none(),
        };
        Signature {
            sig_items: vec![
                item(SignatureItemDesc::Tsig_open(open_js())),
                item(SignatureItemDesc::Tsig_value(ValueDescription {
                    val_id: Ident::create_local("x"),
                    val_name: Located::mknoloc("x".into()),
                    val_desc: int_annotation(),
                    val_val: int_value(),
                    val_prim: vec![],
                    val_loc: Location::none(),
                    val_attributes: vec![],
                })),
                item(SignatureItemDesc::Tsig_module(ModuleDeclaration {
                    md_id: Ident::create_local("M"),
                    md_name: Located::mknoloc("M".into()),
                    md_type: empty_module_type(),
                    md_attributes: vec![],
                    md_loc: Location::none(),
                })),
                item(SignatureItemDesc::Tsig_class(vec![class_named(
                    "c",
                    opened_class_type(),
                )])),
            ],
            sig_type: vec![],
            sig_final_env: full_env(),
        }
    }

    /// `module M: {} = {}; class c = Js.(fun (Js.(_)) -> object end); open Js`
    fn module_and_class_structure() -> Structure {
        let item = |str_desc: StructureItemDesc| StructureItem {
            str_desc,
            str_loc: Location::none(),
            str_env: full_env(),
        };
        let module_expr = |mod_desc: ModuleExprDesc| ModuleExpr {
            mod_desc,
            mod_loc: Location::none(),
            mod_type: decl::ModuleType::MtySignature(vec![]),
            mod_env: full_env(),
            mod_attributes: vec![],
        };
        let constrained = module_expr(ModuleExprDesc::Tmod_constraint(
            Box::new(module_expr(ModuleExprDesc::Tmod_structure(empty_structure()))),
            decl::ModuleType::MtySignature(vec![]),
            ModuleTypeConstraint::Tmodtype_explicit(Box::new(empty_module_type())),
            ModuleCoercion::Tcoerce_none,
        ));
        Structure {
            str_items: vec![
                item(StructureItemDesc::Tstr_module(ModuleBinding {
                    mb_id: Ident::create_local("M"),
                    mb_name: Located::mknoloc("M".into()),
                    mb_expr: constrained,
                    mb_attributes: vec![],
                    mb_loc: Location::none(),
                })),
                item(StructureItemDesc::Tstr_class(vec![(
                    class_named("c", opened_class_expr()),
                    vec![],
                )])),
                item(StructureItemDesc::Tstr_open(open_js())),
            ],
            str_type: vec![],
            str_final_env: full_env(),
        }
    }

    /// Counts of full and reduced environments anywhere in `tree`.
    fn env_forms<T: serde::Serialize>(tree: &T) -> (usize, usize) {
        let json = serde_json::to_string(tree).unwrap();
        (
            json.matches("\"summary_only\":false").count(),
            json.matches("\"summary_only\":true").count(),
        )
    }

    #[test]
    fn test_every_env_is_summarized() {
        let original = sample_structure();
        assert!(!original.str_final_env.is_summary());

        let summarized = summarize_structure(original.clone());
        assert!(all_summarized(&summarized));
        assert_eq!(
            summarized.str_final_env.summary(),
            original.str_final_env.summary()
        );
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let once = summarize_structure(sample_structure());
        let twice = summarize_structure(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_structure_shape_is_preserved() {
        let original = sample_structure();
        let summarized = summarize_structure(original.clone());
        assert_eq!(summarized.str_items.len(), original.str_items.len());
        assert_eq!(summarized.str_items[0].str_loc, original.str_items[0].str_loc);
        assert_eq!(summarized.str_type, original.str_type);
    }

    #[test]
    fn test_partial_fragments() {
        let parts = vec![
            BinaryPart::PartialExpression(constant(1)),
            BinaryPart::PartialStructure(sample_structure()),
        ];
        let BinaryAnnots::PartialImplementation(parts) =
            summarize_annots(BinaryAnnots::PartialImplementation(parts))
        else {
            panic!("variant changed");
        };
        assert_eq!(parts.len(), 2);
        match &parts[0] {
            BinaryPart::PartialExpression(e) => assert!(e.exp_env.is_summary()),
            other => panic!("unexpected fragment {other:?}"),
        }
        match &parts[1] {
            BinaryPart::PartialStructure(s) => assert!(all_summarized(s)),
            other => panic!("unexpected fragment {other:?}"),
        }
    }

    #[test]
    fn test_packed_is_unchanged() {
        let annots = BinaryAnnots::Packed(vec![], vec!["A.cmt".into(), "B.cmt".into()]);
        assert_eq!(summarize_annots(annots.clone()), annots);
    }

    #[test]
    fn test_alias_coercion_env() {
        let mut c = ModuleCoercion::Tcoerce_alias(
            full_env(),
            Path::pident(Ident::create_persistent("M")),
            Box::new(ModuleCoercion::Tcoerce_none),
        );
        module_coercion(&mut c);
        let ModuleCoercion::Tcoerce_alias(e, _, _) = &c else {
            unreachable!()
        };
        assert!(e.is_summary());
    }

    #[test]
    fn test_type_var_pattern_untouched() {
        let p = Pattern::new(
            PatternDesc::Tpat_any,
            Location::none(),
            TypeExpr::generic(TypeDesc::Tvar(None), 9),
            full_env(),
        );
        let part = summarize_part(BinaryPart::PartialPattern(p.clone()));
        let BinaryPart::PartialPattern(q) = part else {
            unreachable!()
        };
        assert_eq!(q.pat_type, p.pat_type);
        assert!(q.pat_env.is_summary());
    }

    #[test]
    fn test_signature_envs_are_summarized() {
        let original = sample_signature();
        let (full, reduced) = env_forms(&original);
        assert!(full >= 12, "fixture has only {full} environments");
        assert_eq!(reduced, 0);

        let summarized = summarize_signature(original.clone());
        assert_eq!(env_forms(&summarized), (0, full));
        assert_eq!(summarized.sig_items.len(), original.sig_items.len());
        assert_eq!(
            summarized.sig_final_env.summary(),
            original.sig_final_env.summary()
        );

        let SignatureItemDesc::Tsig_open(od) = &summarized.sig_items[0].sig_desc else {
            panic!("item order changed");
        };
        assert!(od.open_env.is_summary());
        assert_eq!(od.open_env.summary().len(), open_env().summary().len());
    }

    #[test]
    fn test_module_and_class_envs_are_summarized() {
        let original = module_and_class_structure();
        let (full, reduced) = env_forms(&original);
        assert!(full >= 15, "fixture has only {full} environments");
        assert_eq!(reduced, 0);

        let summarized = summarize_structure(original);
        assert_eq!(env_forms(&summarized), (0, full));

        let StructureItemDesc::Tstr_class(classes) = &summarized.str_items[1].str_desc else {
            panic!("item order changed");
        };
        let class = &classes[0].0;
        let ClassExprDesc::Tcl_open(_, _, _, class_env, fun) = &class.ci_expr.cl_desc else {
            panic!("class shape changed");
        };
        assert!(class_env.is_summary());
        let ClassExprDesc::Tcl_fun(_, param, _, _, _) = &fun.cl_desc else {
            panic!("class shape changed");
        };
        let PatExtra::Tpat_open(_, _, pat_open_env) = &param.pat_extra[0].0 else {
            panic!("pattern extra changed");
        };
        assert!(pat_open_env.is_summary());
    }

    #[test]
    fn test_interface_summarize_is_idempotent() {
        let once = summarize_annots(BinaryAnnots::Interface(sample_signature()));
        assert!(matches!(&once, BinaryAnnots::Interface(_)));
        assert_eq!(env_forms(&once).0, 0);
        assert_eq!(summarize_annots(once.clone()), once);
    }
}
